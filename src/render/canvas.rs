//=========================================================================
// Canvas
//=========================================================================
//
// Off-screen RGBA raster the scenes draw into once per frame.
//
// Architecture:
//   RenderObject::draw ──> Canvas (embedded-graphics DrawTarget)
//                            │
//                            └─ RgbaImage ──> Presenter (window / LCD)
//
// Primitives (rectangles, text) go through embedded-graphics. Image blits
// alpha-blend straight into the backing `RgbaImage`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{Rgba, RgbaImage};

//=== Internal Dependencies ===============================================

use super::font::Font;

//=== Canvas ==============================================================

/// Mutable 2-D RGBA canvas of a fixed size.
pub struct Canvas {
    image: RgbaImage,
    background: Rgb888,
}

impl Canvas {
    //--- Construction -----------------------------------------------------

    /// Creates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        let mut canvas = Self {
            image: RgbaImage::new(width, height),
            background,
        };
        canvas.clear();
        canvas
    }

    //--- Frame ------------------------------------------------------------

    /// Fills the whole canvas with the background colour.
    pub fn clear(&mut self) {
        let fill = to_rgba(self.background);
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    pub fn set_background(&mut self, background: Rgb888) {
        self.background = background;
    }

    //=====================================================================
    // Primitives
    //=====================================================================

    pub fn fill_rect(&mut self, rect: Rectangle, color: Rgb888) {
        let _ = rect.into_styled(PrimitiveStyle::with_fill(color)).draw(self);
    }

    /// Draws a rectangle outline `width` pixels thick, inside `rect`.
    pub fn stroke_rect(&mut self, rect: Rectangle, color: Rgb888, width: u32) {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(color)
            .stroke_width(width)
            .stroke_alignment(embedded_graphics::primitives::StrokeAlignment::Inside)
            .build();
        let _ = rect.into_styled(style).draw(self);
    }

    /// Draws `text` centred horizontally and vertically on `center`.
    pub fn draw_text_centered(&mut self, text: &str, center: Point, font: Font, color: Rgb888) {
        let character_style = MonoTextStyle::new(font.mono(), color);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let _ = Text::with_text_style(text, center, character_style, text_style).draw(self);
    }

    /// Draws `text` with its top-left corner at `top_left`.
    pub fn draw_text(&mut self, text: &str, top_left: Point, font: Font, color: Rgb888) {
        let character_style = MonoTextStyle::new(font.mono(), color);
        let _ = Text::with_baseline(text, top_left, character_style, Baseline::Top).draw(self);
    }

    /// Alpha-blends `source` onto the canvas with its top-left at `top_left`.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn blit(&mut self, source: &RgbaImage, top_left: Point) {
        let (width, height) = self.image.dimensions();

        for (sx, sy, src) in source.enumerate_pixels() {
            let x = top_left.x + sx as i32;
            let y = top_left.y + sy as i32;
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                continue;
            }

            let alpha = src[3] as u32;
            if alpha == 0 {
                continue;
            }

            let dst = self.image.get_pixel_mut(x as u32, y as u32);
            if alpha == 255 {
                *dst = *src;
                continue;
            }

            for channel in 0..3 {
                let blended = (src[channel] as u32 * alpha + dst[channel] as u32 * (255 - alpha)) / 255;
                dst[channel] = blended as u8;
            }
            dst[3] = 255;
        }
    }

    //=====================================================================
    // Accessors
    //=====================================================================

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Centre point of the canvas.
    pub fn center(&self) -> Point {
        Point::new(self.width() as i32 / 2, self.height() as i32 / 2)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major, 4 bytes per pixel.
    pub fn as_rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Returns the colour at `(x, y)`, ignoring alpha.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.image.get_pixel(x, y);
        Some(Rgb888::new(p[0], p[1], p[2]))
    }
}

//=== embedded-graphics Integration =======================================

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < width && y < height {
                self.image.put_pixel(x, y, to_rgba(color));
            }
        }
        Ok(())
    }
}

fn to_rgba(color: Rgb888) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(32, 24, Rgb888::WHITE)
    }

    #[test]
    fn new_canvas_is_background_filled() {
        let canvas = canvas();
        assert_eq!(canvas.pixel(0, 0), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(31, 23), Some(Rgb888::WHITE));
        assert_eq!(canvas.as_rgba().len(), 32 * 24 * 4);
    }

    #[test]
    fn fill_rect_paints_inside_only() {
        let mut canvas = canvas();
        canvas.fill_rect(Rectangle::new(Point::new(2, 2), Size::new(4, 4)), Rgb888::RED);

        assert_eq!(canvas.pixel(2, 2), Some(Rgb888::RED));
        assert_eq!(canvas.pixel(5, 5), Some(Rgb888::RED));
        assert_eq!(canvas.pixel(6, 6), Some(Rgb888::WHITE));
    }

    #[test]
    fn stroke_rect_leaves_interior_untouched() {
        let mut canvas = canvas();
        canvas.stroke_rect(Rectangle::new(Point::new(0, 0), Size::new(10, 10)), Rgb888::BLUE, 2);

        assert_eq!(canvas.pixel(0, 0), Some(Rgb888::BLUE));
        assert_eq!(canvas.pixel(1, 5), Some(Rgb888::BLUE));
        assert_eq!(canvas.pixel(5, 5), Some(Rgb888::WHITE));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut canvas = canvas();
        canvas.fill_rect(Rectangle::new(Point::new(-5, -5), Size::new(8, 8)), Rgb888::BLACK);
        canvas.fill_rect(Rectangle::new(Point::new(30, 20), Size::new(10, 10)), Rgb888::BLACK);

        assert_eq!(canvas.pixel(2, 2), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(31, 23), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(3, 3), Some(Rgb888::WHITE));
    }

    #[test]
    fn blit_blends_by_alpha_and_skips_transparent() {
        let mut canvas = Canvas::new(4, 1, Rgb888::BLACK);
        let mut sprite = RgbaImage::new(3, 1);
        sprite.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        sprite.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        sprite.put_pixel(2, 0, Rgba([255, 0, 0, 51]));

        canvas.blit(&sprite, Point::new(1, 0));

        assert_eq!(canvas.pixel(1, 0), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(2, 0), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(3, 0), Some(Rgb888::new(51, 0, 0)));
    }

    #[test]
    fn clear_restores_background() {
        let mut canvas = canvas();
        canvas.fill_rect(Rectangle::new(Point::zero(), Size::new(32, 24)), Rgb888::GREEN);
        canvas.clear();
        assert_eq!(canvas.pixel(10, 10), Some(Rgb888::WHITE));
    }

    #[test]
    fn centered_text_draws_around_center() {
        let mut canvas = Canvas::new(64, 32, Rgb888::WHITE);
        canvas.draw_text_centered("MM", canvas.center(), Font::default(), Rgb888::BLACK);

        let inked = canvas
            .image()
            .pixels()
            .filter(|p| p[0] == 0)
            .count();
        assert!(inked > 0);
        assert_eq!(canvas.pixel(0, 0), Some(Rgb888::WHITE));
    }
}
