//=========================================================================
// Action Mapper
//=========================================================================
//
// Maps physical inputs to logical actions.
//
// Architecture:
//   PhysicalInput → HashMap → InputAction
//
// The table is many-to-one: several keys (arrow + WASD) may share one
// action. A physical input maps to at most one action.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{
    action::InputAction,
    event::{KeyCode, PhysicalInput},
};

//=== ActionMapper ========================================================

/// Binding table from physical inputs to actions.
#[derive(Debug, Clone, Default)]
pub struct ActionMapper {
    bindings: HashMap<PhysicalInput, InputAction>,
}

impl ActionMapper {
    /// Creates a mapper with no bindings.
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    /// Creates a mapper with the default desktop keyboard layout.
    ///
    /// | Action | Keys                |
    /// |--------|---------------------|
    /// | UP     | ArrowUp, W          |
    /// | DOWN   | ArrowDown, S        |
    /// | LEFT   | ArrowLeft, A        |
    /// | RIGHT  | ArrowRight, D       |
    /// | ENTER  | Enter, Space, Z     |
    /// | PREV   | `[`, Q              |
    /// | NEXT   | `]`, E              |
    /// | ESCAPE | Escape              |
    pub fn keyboard_defaults() -> Self {
        let mut mapper = Self::new();

        let table: [(InputAction, &[KeyCode]); 8] = [
            (InputAction::Up, &[KeyCode::ArrowUp, KeyCode::KeyW]),
            (InputAction::Down, &[KeyCode::ArrowDown, KeyCode::KeyS]),
            (InputAction::Left, &[KeyCode::ArrowLeft, KeyCode::KeyA]),
            (InputAction::Right, &[KeyCode::ArrowRight, KeyCode::KeyD]),
            (InputAction::Enter, &[KeyCode::Enter, KeyCode::Space, KeyCode::KeyZ]),
            (InputAction::Prev, &[KeyCode::BracketLeft, KeyCode::KeyQ]),
            (InputAction::Next, &[KeyCode::BracketRight, KeyCode::KeyE]),
            (InputAction::Escape, &[KeyCode::Escape]),
        ];

        for (action, keys) in table {
            for key in keys {
                mapper.bind_key(*key, action);
            }
        }

        mapper
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a physical input to an action, replacing any previous binding.
    pub fn bind(&mut self, input: PhysicalInput, action: InputAction) {
        if let Some(previous) = self.bindings.insert(input, action) {
            if previous != action {
                warn!("{:?} rebound from {} to {}", input, previous, action);
            }
        } else {
            debug!("Bound {:?} to {}", input, action);
        }
    }

    pub fn bind_key(&mut self, key: KeyCode, action: InputAction) {
        self.bind(PhysicalInput::Key(key), action);
    }

    /// Binds a GPIO pin (BCM numbering) to an action.
    pub fn bind_pin(&mut self, pin: u8, action: InputAction) {
        self.bind(PhysicalInput::Pin(pin), action);
    }

    /// Removes a binding. Returns the action it was bound to.
    pub fn unbind(&mut self, input: PhysicalInput) -> Option<InputAction> {
        self.bindings.remove(&input)
    }

    //--- Mapping ----------------------------------------------------------

    /// Returns the action for a physical input, if bound.
    pub fn map(&self, input: PhysicalInput) -> Option<InputAction> {
        self.bindings.get(&input).copied()
    }

    /// Returns every physical input bound to `action`, sorted.
    pub fn aliases(&self, action: InputAction) -> Vec<PhysicalInput> {
        let mut inputs: Vec<_> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(input, _)| *input)
            .collect();
        inputs.sort();
        inputs
    }

    /// GPIO pins with a binding, sorted. Used by the GPIO adapter to decide
    /// which pins to export.
    pub fn bound_pins(&self) -> Vec<u8> {
        let mut pins: Vec<u8> = self
            .bindings
            .keys()
            .filter_map(|input| match input {
                PhysicalInput::Pin(pin) => Some(*pin),
                PhysicalInput::Key(_) => None,
            })
            .collect();
        pins.sort_unstable();
        pins
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
