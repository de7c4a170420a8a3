//=========================================================================
// Physical Input Events
//
// Platform-independent representation of raw physical inputs.
//
// Both desktop keyboards and GPIO push-buttons are reduced to the same
// press/release edges of a `PhysicalInput`, so the rest of the input
// pipeline never knows which adapter produced an event.
//
// Event Flow:
// ```text
// Keyboard adapter (winit) ──┐
//                            ├──> InputEvent ──> ActionMapper ──> InputState
// GPIO adapter (sysfs)   ────┘
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Only keys with a default binding are listed; everything else arrives
/// as `Unidentified` and is dropped by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Letter keys
    KeyA,
    KeyD,
    KeyE,
    KeyQ,
    KeyS,
    KeyW,
    KeyZ,

    // Punctuation
    BracketLeft,
    BracketRight,

    // Special keys
    Space,
    Enter,
    Escape,

    /// Unknown or unmapped key.
    Unidentified,
}

//=== PhysicalInput =======================================================

/// A physical control that can be held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysicalInput {
    /// Keyboard key (desktop development build).
    Key(KeyCode),

    /// GPIO push-button, identified by its BCM pin number.
    Pin(u8),
}

impl From<KeyCode> for PhysicalInput {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

//=== InputEvent ==========================================================

/// A single edge of a physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Pressed(PhysicalInput),
    Released(PhysicalInput),
}

impl InputEvent {
    /// Returns the control this event belongs to.
    pub fn input(&self) -> PhysicalInput {
        match self {
            Self::Pressed(input) | Self::Released(input) => *input,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, Self::Pressed(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_reports_its_input() {
        let press = InputEvent::Pressed(PhysicalInput::Pin(21));
        let release = InputEvent::Released(KeyCode::Escape.into());

        assert_eq!(press.input(), PhysicalInput::Pin(21));
        assert!(press.is_press());
        assert_eq!(release.input(), PhysicalInput::Key(KeyCode::Escape));
        assert!(!release.is_press());
    }

    #[test]
    fn key_and_pin_inputs_are_distinct() {
        assert_ne!(PhysicalInput::Key(KeyCode::Enter), PhysicalInput::Pin(16));
    }
}
