//=========================================================================
// Focusable Component
//=========================================================================
//
// One on-screen element of a scene: a render object plus its navigation
// role (selectable control or decoration) and its callbacks.
//
// Callbacks are plain boxed closures with a no-op default, so a component
// without an action can be activated safely.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::RenderObject;
use crate::core::time::FrameTime;
use crate::render::{Canvas, Point, Rectangle};

//=== Callback ============================================================

/// Zero-argument component callback.
pub type Callback = Box<dyn FnMut()>;

fn noop() -> Callback {
    Box::new(|| {})
}

//=== FocusableComponent ==================================================

/// A navigable control or a decorative element.
///
/// Selectability is fixed at construction.
pub struct FocusableComponent {
    render_object: Box<dyn RenderObject>,
    selectable: bool,
    on_activate: Callback,
    on_focus: Callback,
}

impl FocusableComponent {
    //--- Construction -----------------------------------------------------

    pub fn new(render_object: impl RenderObject + 'static, selectable: bool) -> Self {
        Self {
            render_object: Box::new(render_object),
            selectable,
            on_activate: noop(),
            on_focus: noop(),
        }
    }

    /// A navigable control.
    pub fn selectable(render_object: impl RenderObject + 'static) -> Self {
        Self::new(render_object, true)
    }

    /// A label, background or other element navigation never lands on.
    pub fn decoration(render_object: impl RenderObject + 'static) -> Self {
        Self::new(render_object, false)
    }

    /// Sets the callback run when the component is activated.
    pub fn on_activate(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_activate = Box::new(callback);
        self
    }

    /// Sets the callback run when focus moves onto the component.
    pub fn on_focus(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_focus = Box::new(callback);
        self
    }

    //--- Behaviour --------------------------------------------------------

    pub fn draw(&self, canvas: &mut Canvas, time: &FrameTime) {
        self.render_object.draw(canvas, time);
    }

    pub fn update(&mut self, time: &FrameTime) {
        self.render_object.update(time);
    }

    /// Runs the activation callback. Does nothing for decorations.
    pub fn activate(&mut self) {
        if !self.selectable {
            return;
        }
        (self.on_activate)();
    }

    /// Runs the focus callback.
    ///
    /// The manager calls this once per focus transition; calling it again
    /// simply re-runs the callback.
    pub fn focus(&mut self) {
        (self.on_focus)();
    }

    //--- Accessors --------------------------------------------------------

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn bounds(&self) -> Rectangle {
        self.render_object.bounds()
    }

    /// Centroid of the component's bounds.
    pub fn center(&self) -> Point {
        self.render_object.bounds().center()
    }

    pub fn render_object(&self) -> &dyn RenderObject {
        self.render_object.as_ref()
    }

    pub fn render_object_mut(&mut self) -> &mut dyn RenderObject {
        self.render_object.as_mut()
    }
}

impl std::fmt::Debug for FocusableComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusableComponent")
            .field("bounds", &self.bounds())
            .field("selectable", &self.selectable)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ui::tests::Block;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn activate_runs_callback_when_selectable() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut component = FocusableComponent::selectable(Block::at(0, 0))
            .on_activate(move || counter.set(counter.get() + 1));

        component.activate();
        component.activate();

        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn activate_is_noop_for_decoration() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut component = FocusableComponent::decoration(Block::at(0, 0))
            .on_activate(move || counter.set(counter.get() + 1));

        component.activate();

        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn missing_callbacks_are_noops() {
        let mut component = FocusableComponent::selectable(Block::at(0, 0));
        component.activate();
        component.focus();
        component.focus();
    }

    #[test]
    fn center_is_bounds_centroid() {
        let component = FocusableComponent::decoration(Block::at(10, 20));
        assert_eq!(component.center(), Point::new(15, 25));
    }
}
