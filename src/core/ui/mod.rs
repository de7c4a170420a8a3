//=========================================================================
// UI Composition
//
// Focus-navigable UI built from render objects.
//
// Architecture:
//   UiComponentManager
//     ├─ components: Vec<FocusableComponent>   (insertion = draw order)
//     ├─ selectable: Vec<usize>                (navigation subset)
//     └─ cursor: Option<Box<dyn RenderObject>> (drawn last, usually a Cursor)
//
//   FocusableComponent
//     └─ render_object: Box<dyn RenderObject>
//
//=========================================================================

//=== Module Declarations =================================================

mod component;
mod component_manager;
mod cursor;

//=== Public API ==========================================================

pub use component::{Callback, FocusableComponent};
pub use component_manager::{ComponentId, CursorMode, UiComponentManager};
pub use cursor::Cursor;

//=== Internal Dependencies ===============================================

use crate::core::time::FrameTime;
use crate::render::{Canvas, Point, Rectangle};

//=== RenderObject Trait ==================================================

/// Anything with a position that can draw itself onto the canvas.
///
/// `draw` must only read state: animation that depends on time reads the
/// supplied [`FrameTime`], and state changes belong in `update`.
pub trait RenderObject {
    /// Screen-space bounding box.
    fn bounds(&self) -> Rectangle;

    fn draw(&self, canvas: &mut Canvas, time: &FrameTime);

    /// Per-frame animation step. Default does nothing.
    fn update(&mut self, _time: &FrameTime) {}

    /// Moves the object so its bounds are centred on `center`.
    fn set_center(&mut self, center: Point);
}

//=========================================================================
// Test Support
//=========================================================================
