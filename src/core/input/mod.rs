//=========================================================================
// Input System
//
// High-level interface for input handling within the frame loop.
// Owns the `InputState` scenes read and the queue adapters write into.
//
// Responsibilities:
// - Hand out `InputSource` handles to platform adapters
// - Drain queued physical events once per frame and map them to actions
// - Expose the read-only `InputState` for the active scene
// - Close the frame with `end_frame()` (clears just-pressed)
//
// Notes:
// The queue is a crossbeam channel, but both ends live on the frame
// thread: adapters push from window callbacks or GPIO polls, the frame
// driver pumps before calling into the scene. An adapter that fails to
// start simply never sends, which leaves the state inert.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod action;
pub mod action_mapper;
pub mod event;
pub mod input_state;

//=== Public API ==========================================================

pub use action::InputAction;
pub use action_mapper::ActionMapper;
pub use event::{InputEvent, KeyCode, PhysicalInput};
pub use input_state::InputState;

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{trace, warn};

//=== InputSource =========================================================

/// Sending half handed to platform adapters.
///
/// Cheap to clone. Events sent while the queue is full are dropped with a
/// warning rather than blocking the caller.
#[derive(Debug, Clone)]
pub struct InputSource {
    sender: Sender<InputEvent>,
}

impl InputSource {
    /// Queues an event. Returns `false` if it was dropped.
    pub fn send(&self, event: InputEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(target: "platform::input", "Input queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(target: "platform::input", "Input system gone, dropping event");
                false
            }
        }
    }

    pub fn press(&self, input: impl Into<PhysicalInput>) -> bool {
        self.send(InputEvent::Pressed(input.into()))
    }

    pub fn release(&self, input: impl Into<PhysicalInput>) -> bool {
        self.send(InputEvent::Released(input.into()))
    }
}

//=== InputSystem =========================================================

/// Owns the action mapper, the input queue and the frame's [`InputState`].
pub struct InputSystem {
    mapper: ActionMapper,
    state: InputState,
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates an input system with a queue of `capacity` events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(mapper: ActionMapper, capacity: usize) -> Self {
        assert!(capacity > 0, "Input queue capacity must be positive");
        let (sender, receiver) = bounded(capacity);
        Self {
            mapper,
            state: InputState::new(),
            sender,
            receiver,
        }
    }

    /// Returns a new handle for a platform adapter.
    pub fn source(&self) -> InputSource {
        InputSource { sender: self.sender.clone() }
    }

    //--- pump() -----------------------------------------------------------
    //
    // Drains every queued event, maps it through the binding table and
    // applies it to the state. Unmapped inputs are ignored. Returns the
    // number of events that changed the state's input.
    //
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;

        for event in self.receiver.try_iter() {
            let input = event.input();
            let Some(action) = self.mapper.map(input) else {
                trace!(target: "platform::input", "Unmapped input ignored: {:?}", input);
                continue;
            };

            match event {
                InputEvent::Pressed(_) => self.state.press(action, input),
                InputEvent::Released(_) => self.state.release(action, input),
            }
            applied += 1;
        }

        applied
    }

    /// Applies queued events, then lets go of every action. Used when key
    /// releases will not arrive, such as after the window lost focus.
    pub fn release_all(&mut self) {
        self.pump();
        self.state.release_all();
    }

    /// Closes the frame. Call after the scene has drawn.
    pub fn end_frame(&mut self) {
        self.state.clear_just_pressed();
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    pub fn mapper(&self) -> &ActionMapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut ActionMapper {
        &mut self.mapper
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> InputSystem {
        InputSystem::new(ActionMapper::keyboard_defaults(), 16)
    }

    #[test]
    fn pumped_key_press_becomes_action() {
        let mut input = system();
        let source = input.source();

        source.press(KeyCode::ArrowDown);
        assert_eq!(input.pump(), 1);

        assert!(input.state().is_just_pressed(InputAction::Down));
        assert!(input.state().is_held(InputAction::Down));
    }

    #[test]
    fn events_wait_in_queue_until_pumped() {
        let mut input = system();
        input.source().press(KeyCode::Enter);

        assert!(!input.state().is_held(InputAction::Enter));
        input.pump();
        assert!(input.state().is_held(InputAction::Enter));
    }

    #[test]
    fn unmapped_input_is_ignored() {
        let mut input = system();
        input.source().press(KeyCode::Unidentified);
        input.source().press(PhysicalInput::Pin(5));

        assert_eq!(input.pump(), 0);
        assert_eq!(input.state().held().count(), 0);
    }

    #[test]
    fn end_frame_clears_just_pressed() {
        let mut input = system();
        input.source().press(KeyCode::Escape);
        input.pump();
        input.end_frame();

        assert!(!input.state().is_just_pressed(InputAction::Escape));
        assert!(input.state().is_held(InputAction::Escape));
    }

    #[test]
    fn release_all_drops_held_and_queued_presses() {
        let mut input = system();
        let source = input.source();
        source.press(KeyCode::ArrowLeft);
        input.pump();
        input.end_frame();
        source.press(KeyCode::KeyD);

        input.release_all();

        assert_eq!(input.state().held().count(), 0);
        assert!(!input.state().any_just_pressed());

        // The late release of a key let go in another window is harmless.
        source.release(KeyCode::ArrowLeft);
        input.pump();
        assert!(!input.state().is_held(InputAction::Left));
    }

    #[test]
    fn full_queue_drops_events() {
        let input = InputSystem::new(ActionMapper::keyboard_defaults(), 1);
        let source = input.source();

        assert!(source.press(KeyCode::KeyW));
        assert!(!source.release(KeyCode::KeyW));
    }

    #[test]
    fn source_outliving_system_does_not_panic() {
        let source = system().source();
        assert!(!source.press(KeyCode::Enter));
    }

    #[test]
    #[should_panic(expected = "Input queue capacity must be positive")]
    fn zero_capacity_panics() {
        InputSystem::new(ActionMapper::new(), 0);
    }
}
