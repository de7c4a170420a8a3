//=========================================================================
// UI Component Manager
//=========================================================================
//
// Selection state machine for one scene's components.
//
// Architecture:
//   add_component() ──> components (draw order)
//                   └─> selectable (ids of selectable components only)
//
//   focused: index into `selectable`, or None
//
// Navigation walks the selectable subset with wraparound. Decorations are
// never part of the subset, so an all-decoration list cannot trap the
// walk. The cursor is repositioned onto the focused component's centroid
// on every focus change and drawn after all components.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::{FocusableComponent, RenderObject};
use crate::core::time::FrameTime;
use crate::render::Canvas;

//=== Types ===============================================================

/// Position of a component in its manager's insertion order.
pub type ComponentId = usize;

/// How the cursor reacts to activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Cursor is shown whenever something is focused.
    #[default]
    AlwaysVisible,

    /// Cursor starts hidden. The first activation reveals it and is
    /// consumed; the next activation runs the component and hides the
    /// cursor again.
    WakeOnActivate,
}

//=== UiComponentManager ==================================================

/// Ordered components plus the focus pointer over their selectable subset.
pub struct UiComponentManager {
    components: Vec<FocusableComponent>,
    selectable: Vec<ComponentId>,

    /// Index into `selectable`.
    focused: Option<usize>,

    /// Selectable position to restore while a list is being rebuilt.
    restore: Option<usize>,

    cursor: Option<Box<dyn RenderObject>>,
    cursor_mode: CursorMode,
    cursor_awake: bool,
    enabled: bool,
}

impl UiComponentManager {
    //--- Construction -----------------------------------------------------

    /// Creates an empty, enabled manager without a cursor.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            selectable: Vec::new(),
            focused: None,
            restore: None,
            cursor: None,
            cursor_mode: CursorMode::AlwaysVisible,
            cursor_awake: false,
            enabled: true,
        }
    }

    /// Creates a manager with a cursor.
    pub fn with_cursor(cursor: impl RenderObject + 'static, mode: CursorMode) -> Self {
        let mut manager = Self::new();
        manager.set_cursor(cursor, mode);
        manager
    }

    /// Installs the cursor. It survives [`clear_components`](Self::clear_components).
    pub fn set_cursor(&mut self, cursor: impl RenderObject + 'static, mode: CursorMode) {
        self.cursor = Some(Box::new(cursor));
        self.cursor_mode = mode;
        self.cursor_awake = false;
        self.move_cursor();
    }

    //--- add_component() --------------------------------------------------
    //
    // Appends a component. The first selectable component added to an
    // unfocused manager takes focus at once. After a non-resetting clear,
    // focus follows each new selectable component up to the remembered
    // position and snaps onto it when that position is re-added; if the
    // rebuilt list is shorter, focus stays on its last selectable entry.
    //
    pub fn add_component(&mut self, component: FocusableComponent) -> ComponentId {
        let id = self.components.len();
        let selectable = component.is_selectable();
        self.components.push(component);

        if !selectable {
            return id;
        }

        let position = self.selectable.len();
        self.selectable.push(id);

        match self.restore {
            Some(target) if position == target => {
                self.restore = None;
                self.focus_at(position, true);
            }
            Some(target) if position < target => {
                self.focus_at(position, false);
            }
            Some(_) => {}
            None if self.focused.is_none() => self.focus_at(position, true),
            None => {}
        }

        id
    }

    //--- Navigation -------------------------------------------------------

    /// Moves focus to the next selectable component, wrapping at the end.
    pub fn select_next(&mut self) {
        let count = self.selectable.len();
        if count == 0 {
            return;
        }
        let next = match self.focused {
            Some(index) => (index + 1) % count,
            None => 0,
        };
        self.move_focus(next);
    }

    /// Moves focus to the previous selectable component, wrapping at the start.
    pub fn select_prev(&mut self) {
        let count = self.selectable.len();
        if count == 0 {
            return;
        }
        let prev = match self.focused {
            Some(index) => (index + count - 1) % count,
            None => count - 1,
        };
        self.move_focus(prev);
    }

    /// Activates the focused component, if any.
    pub fn activate_current(&mut self) {
        let Some(position) = self.focused else {
            return;
        };

        if self.cursor_mode == CursorMode::WakeOnActivate && self.cursor.is_some() {
            if !self.cursor_awake {
                self.cursor_awake = true;
                self.move_cursor();
                return;
            }
            self.cursor_awake = false;
        }

        let id = self.selectable[position];
        self.components[id].activate();
    }

    //--- clear_components() -----------------------------------------------
    //
    // Drops every component. With `reset_index == false` the focused
    // position is remembered for the next add sequence.
    //
    pub fn clear_components(&mut self, reset_index: bool) {
        let remembered = self.focused.or(self.restore);

        self.components.clear();
        self.selectable.clear();
        self.focused = None;
        self.cursor_awake = false;
        self.restore = if reset_index { None } else { remembered };
    }

    //--- Frame ------------------------------------------------------------

    /// Advances component animation and keeps the cursor on its target.
    pub fn update(&mut self, time: &FrameTime) {
        for component in &mut self.components {
            component.update(time);
        }
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.update(time);
        }
        self.move_cursor();
    }

    /// Draws components in insertion order, then the cursor on top.
    pub fn draw(&self, canvas: &mut Canvas, time: &FrameTime) {
        for component in &self.components {
            component.draw(canvas, time);
        }

        if self.is_cursor_visible() {
            if let Some(cursor) = self.cursor.as_ref() {
                cursor.draw(canvas, time);
            }
        }
    }

    //--- Enable / Disable -------------------------------------------------

    /// A disabled manager keeps its focus but hides its cursor.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    //=====================================================================
    // Accessors
    //=====================================================================

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn selectable_len(&self) -> usize {
        self.selectable.len()
    }

    /// Focused position within the selectable subset.
    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// Insertion id of the focused component.
    pub fn focused_id(&self) -> Option<ComponentId> {
        self.focused.map(|position| self.selectable[position])
    }

    pub fn focused_component(&self) -> Option<&FocusableComponent> {
        self.focused_id().map(|id| &self.components[id])
    }

    pub fn component(&self, id: ComponentId) -> Option<&FocusableComponent> {
        self.components.get(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut FocusableComponent> {
        self.components.get_mut(id)
    }

    pub fn cursor(&self) -> Option<&dyn RenderObject> {
        self.cursor.as_deref()
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.enabled
            && self.cursor.is_some()
            && self.focused.is_some()
            && (self.cursor_mode == CursorMode::AlwaysVisible || self.cursor_awake)
    }

    //--- Internal Helpers -------------------------------------------------

    fn move_focus(&mut self, position: usize) {
        self.restore = None;
        if self.focused == Some(position) {
            return;
        }
        trace!("Focus {:?} -> {}", self.focused, position);
        self.focus_at(position, true);
    }

    fn focus_at(&mut self, position: usize, notify: bool) {
        self.focused = Some(position);
        self.move_cursor();
        if notify {
            let id = self.selectable[position];
            self.components[id].focus();
        }
    }

    fn move_cursor(&mut self) {
        let Some(id) = self.focused_id() else {
            return;
        };
        let center = self.components[id].center();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.set_center(center);
        }
    }
}

impl Default for UiComponentManager {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
