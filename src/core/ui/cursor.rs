//=========================================================================
// Cursor
//=========================================================================
//
// Focus marker drawn by a `UiComponentManager` on top of its components:
// a ring around the focused component and a hat above it. The hat bobs
// up and down while the cursor is shown.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::TAU;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Triangle};

//=== Internal Dependencies ===============================================

use super::RenderObject;
use crate::core::time::FrameTime;
use crate::render::{Canvas, Point, Rectangle, Rgb888, RgbColor, Size};

const BOUNCE_PERIOD_SECS: f32 = 0.8;
const BOUNCE_HEIGHT: f32 = 3.0;
const RING_WIDTH: u32 = 2;

//=== Cursor ==============================================================

#[derive(Debug, Clone)]
pub struct Cursor {
    area: Rectangle,
    ring: bool,
    color: Rgb888,

    /// Vertical hat offset for the current frame, set in `update`.
    bounce: i32,
}

impl Cursor {
    /// Ring of `width` x `height` plus the hat.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            area: Rectangle::with_center(Point::zero(), Size::new(width, height)),
            ring: true,
            color: Rgb888::BLACK,
            bounce: 0,
        }
    }

    /// Hat only. Used over sprites, where a ring would box the artwork.
    pub fn hat_only(width: u32, height: u32) -> Self {
        Self { ring: false, ..Self::new(width, height) }
    }

    pub fn with_color(mut self, color: Rgb888) -> Self {
        self.color = color;
        self
    }

    /// Downward-pointing triangle resting on the ring's top edge.
    fn hat(&self) -> Triangle {
        let top = self.area.top_left.y;
        let center_x = self.area.center().x;
        let half = (self.area.size.height / 3).clamp(3, 8) as i32;
        let tip_y = top - 2 + self.bounce;

        Triangle::new(
            Point::new(center_x - half, tip_y - half),
            Point::new(center_x + half, tip_y - half),
            Point::new(center_x, tip_y),
        )
    }
}

impl RenderObject for Cursor {
    fn bounds(&self) -> Rectangle {
        self.area
    }

    fn draw(&self, canvas: &mut Canvas, _time: &FrameTime) {
        if self.ring {
            canvas.stroke_rect(self.area, self.color, RING_WIDTH);
        }
        let _ = self
            .hat()
            .into_styled(PrimitiveStyle::with_fill(self.color))
            .draw(canvas);
    }

    fn update(&mut self, time: &FrameTime) {
        let phase = (time.elapsed_secs() / BOUNCE_PERIOD_SECS).fract() * TAU;
        self.bounce = -(phase.sin().abs() * BOUNCE_HEIGHT).round() as i32;
    }

    fn set_center(&mut self, center: Point) {
        self.area = Rectangle::with_center(center, self.area.size);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn follows_center() {
        let mut cursor = Cursor::new(21, 11);
        cursor.set_center(Point::new(50, 40));
        assert_eq!(cursor.bounds().center(), Point::new(50, 40));
        assert_eq!(cursor.bounds().size, Size::new(21, 11));
    }

    #[test]
    fn ring_is_drawn_around_target() {
        let mut canvas = Canvas::new(64, 64, Rgb888::WHITE);
        let mut cursor = Cursor::new(21, 11);
        cursor.set_center(Point::new(32, 32));

        cursor.draw(&mut canvas, &FrameTime::ZERO);

        let top_left = cursor.bounds().top_left;
        assert_eq!(canvas.pixel(top_left.x as u32, top_left.y as u32), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(32, 32), Some(Rgb888::WHITE));
    }

    #[test]
    fn hat_only_leaves_ring_area_blank() {
        let mut canvas = Canvas::new(64, 64, Rgb888::WHITE);
        let mut cursor = Cursor::hat_only(21, 21);
        cursor.set_center(Point::new(32, 40));

        cursor.draw(&mut canvas, &FrameTime::ZERO);

        let top_left = cursor.bounds().top_left;
        assert_eq!(canvas.pixel(top_left.x as u32, top_left.y as u32), Some(Rgb888::WHITE));
        // Hat tip sits just above the ring.
        assert_eq!(canvas.pixel(32, (top_left.y - 3) as u32), Some(Rgb888::BLACK));
    }

    #[test]
    fn bounce_lifts_the_hat_mid_period() {
        let mut cursor = Cursor::new(21, 11);
        cursor.update(&FrameTime::at(Duration::ZERO));
        assert_eq!(cursor.bounce, 0);

        cursor.update(&FrameTime::at(Duration::from_millis(200)));
        assert_eq!(cursor.bounce, -3);
    }
}
