//=========================================================================
// Game Widgets
//=========================================================================
//
// Render objects the scenes compose their screens from: text labels,
// framed buttons, image sprites and the animated mushroom sprite.
//
// Anything backed by an image degrades to a placeholder rectangle when
// the image is missing, so a broken asset never stops a scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::model::{MushroomKind, SPRITE_DIRECTIONS};
use crate::core::time::FrameTime;
use crate::core::ui::RenderObject;
use crate::render::{Canvas, Font, Point, Rectangle, Rgb888, RgbColor, Size};
use crate::services::{ImageHandle, ResourceLoader};

const PLACEHOLDER_FILL: Rgb888 = Rgb888::new(200, 200, 200);

//=== TextLabel ===========================================================

/// Single line of text centred on a point.
#[derive(Debug, Clone)]
pub struct TextLabel {
    text: String,
    center: Point,
    font: Font,
    color: Rgb888,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, center: Point, font: Font) -> Self {
        Self {
            text: text.into(),
            center,
            font,
            color: Rgb888::BLACK,
        }
    }

    pub fn with_color(mut self, color: Rgb888) -> Self {
        self.color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl RenderObject for TextLabel {
    fn bounds(&self) -> Rectangle {
        let size = Size::new(self.font.text_width(&self.text), self.font.line_height());
        Rectangle::with_center(self.center, size)
    }

    fn draw(&self, canvas: &mut Canvas, _time: &FrameTime) {
        canvas.draw_text_centered(&self.text, self.center, self.font, self.color);
    }

    fn set_center(&mut self, center: Point) {
        self.center = center;
    }
}

//=== Button ==============================================================

/// Framed rectangle with a centred caption.
#[derive(Debug, Clone)]
pub struct Button {
    area: Rectangle,
    label: String,
    font: Font,
}

impl Button {
    pub fn new(label: impl Into<String>, center: Point, size: Size, font: Font) -> Self {
        Self {
            area: Rectangle::with_center(center, size),
            label: label.into(),
            font,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl RenderObject for Button {
    fn bounds(&self) -> Rectangle {
        self.area
    }

    fn draw(&self, canvas: &mut Canvas, _time: &FrameTime) {
        canvas.fill_rect(self.area, Rgb888::WHITE);
        canvas.stroke_rect(self.area, Rgb888::BLACK, 1);
        canvas.draw_text_centered(&self.label, self.area.center(), self.font, Rgb888::BLACK);
    }

    fn set_center(&mut self, center: Point) {
        self.area = Rectangle::with_center(center, self.area.size);
    }
}

//=== ImageSprite =========================================================

/// A loaded image, or a captioned grey box when loading failed.
#[derive(Debug, Clone)]
pub struct ImageSprite {
    area: Rectangle,
    image: Option<ImageHandle>,
    fallback: Option<(String, Font)>,
}

impl ImageSprite {
    pub fn load(resources: &mut ResourceLoader, path: &str, center: Point, size: Size) -> Self {
        Self {
            area: Rectangle::with_center(center, size),
            image: resources.load_image(path, size.width, size.height),
            fallback: None,
        }
    }

    /// Caption drawn on the placeholder.
    pub fn with_fallback_label(mut self, label: impl Into<String>, font: Font) -> Self {
        self.fallback = Some((label.into(), font));
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.image.is_none()
    }
}

impl RenderObject for ImageSprite {
    fn bounds(&self) -> Rectangle {
        self.area
    }

    fn draw(&self, canvas: &mut Canvas, _time: &FrameTime) {
        match &self.image {
            Some(image) => canvas.blit(image, self.area.top_left),
            None => {
                draw_placeholder(canvas, self.area, PLACEHOLDER_FILL);
                if let Some((label, font)) = &self.fallback {
                    canvas.draw_text_centered(label, self.area.center(), *font, Rgb888::BLACK);
                }
            }
        }
    }

    fn set_center(&mut self, center: Point) {
        self.area = Rectangle::with_center(center, self.area.size);
    }
}

fn draw_placeholder(canvas: &mut Canvas, area: Rectangle, fill: Rgb888) {
    canvas.fill_rect(area, fill);
    canvas.stroke_rect(area, Rgb888::BLACK, 1);
}

//=========================================================================
// Mushroom Sprite
//=========================================================================

const JUMP_DURATION: Duration = Duration::from_millis(400);
const JUMP_HEIGHT: f32 = 30.0;

#[derive(Debug, Default)]
struct PendingMotion {
    rotations: Cell<u32>,
    jump: Cell<bool>,
}

/// Handle for animating a [`MushroomSprite`] from outside the UI tree,
/// typically from a component callback or a scene timer.
///
/// Requests are applied on the sprite's next `update`.
#[derive(Debug, Clone, Default)]
pub struct MotionTrigger {
    pending: Rc<PendingMotion>,
}

impl MotionTrigger {
    /// Turns the sprite one direction clockwise.
    pub fn rotate(&self) {
        self.pending.rotations.set(self.pending.rotations.get() + 1);
    }

    /// Starts a jump, restarting one already in progress.
    pub fn jump(&self) {
        self.pending.jump.set(true);
    }
}

/// Five-direction mushroom that can spin and jump.
#[derive(Debug, Clone)]
pub struct MushroomSprite {
    kind: MushroomKind,
    frames: Vec<Option<ImageHandle>>,
    direction: usize,
    home: Point,
    size: Size,

    trigger: MotionTrigger,
    jump_started: Option<Duration>,
    lift: i32,
}

impl MushroomSprite {
    pub fn new(resources: &mut ResourceLoader, kind: MushroomKind, center: Point, size: Size) -> Self {
        let frames = (0..SPRITE_DIRECTIONS)
            .map(|direction| resources.load_image(&kind.frame_path(direction), size.width, size.height))
            .collect();

        Self {
            kind,
            frames,
            direction: 0,
            home: center,
            size,
            trigger: MotionTrigger::default(),
            jump_started: None,
            lift: 0,
        }
    }

    pub fn trigger(&self) -> MotionTrigger {
        self.trigger.clone()
    }

    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Current height above the resting position.
    pub fn lift(&self) -> i32 {
        self.lift
    }

    fn placeholder_color(&self) -> Rgb888 {
        match self.kind {
            MushroomKind::Gombo => Rgb888::new(170, 120, 70),
            MushroomKind::Magui => Rgb888::new(200, 50, 50),
        }
    }
}

impl RenderObject for MushroomSprite {
    /// Resting bounds; a jump does not move the focus cursor.
    fn bounds(&self) -> Rectangle {
        Rectangle::with_center(self.home, self.size)
    }

    fn draw(&self, canvas: &mut Canvas, _time: &FrameTime) {
        let area = Rectangle::with_center(self.home - Point::new(0, self.lift), self.size);
        match self.frames.get(self.direction).and_then(Option::as_ref) {
            Some(frame) => canvas.blit(frame, area.top_left),
            None => draw_placeholder(canvas, area, self.placeholder_color()),
        }
    }

    fn update(&mut self, time: &FrameTime) {
        let pending = &self.trigger.pending;

        let rotations = pending.rotations.replace(0) as usize;
        self.direction = (self.direction + rotations) % SPRITE_DIRECTIONS;

        if pending.jump.replace(false) {
            self.jump_started = Some(time.elapsed);
        }

        self.lift = match self.jump_started {
            Some(start) => {
                let progress = time.elapsed.saturating_sub(start).as_secs_f32() / JUMP_DURATION.as_secs_f32();
                if progress >= 1.0 {
                    self.jump_started = None;
                    0
                } else {
                    (4.0 * JUMP_HEIGHT * progress * (1.0 - progress)).round() as i32
                }
            }
            None => 0,
        };
    }

    fn set_center(&mut self, center: Point) {
        self.home = center;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
