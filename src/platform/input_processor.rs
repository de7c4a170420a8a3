//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit keyboard events into engine InputEvents.
//
// Architecture:
//   Winit KeyEvent → InputProcessor → InputEvent → InputSource (queue)
//
// OS auto-repeat is dropped: a held key produces one press and one
// release, exactly like a GPIO button. Keys the engine has no code for
// are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, PhysicalInput};

//=== InputProcessor ======================================================

/// Translates Winit key events and counts what it filters.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    repeats_dropped: u64,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit KeyEvent (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(&mut self, key_event: &KeyEvent) -> Option<InputEvent> {
        self.translate(key_event.physical_key, key_event.state, key_event.repeat)
    }

    pub(crate) fn translate(
        &mut self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<InputEvent> {
        if repeat {
            self.repeats_dropped += 1;
            return None;
        }

        let key_code = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key_code, KeyCode::Unidentified) {
            return None;
        }

        let input = PhysicalInput::Key(key_code);
        Some(match state {
            ElementState::Pressed => InputEvent::Pressed(input),
            ElementState::Released => InputEvent::Released(input),
        })
    }

    pub(crate) fn repeats_dropped(&self) -> u64 {
        self.repeats_dropped
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Maps the keys with a default binding. Everything else returns
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyQ => KeyCode::KeyQ,
            KeyS => KeyCode::KeyS,
            KeyW => KeyCode::KeyW,
            KeyZ => KeyCode::KeyZ,

            //--- Punctuation --------------------------------------------------

            BracketLeft => KeyCode::BracketLeft,
            BracketRight => KeyCode::BracketRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter | NumpadEnter => KeyCode::Enter,
            Escape => KeyCode::Escape,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
