//=========================================================================
// Input State
//=========================================================================
//
// Per-frame record of held and just-pressed logical actions.
//
// Architecture:
//   (action, source) edges → press()/release() → held / just_pressed → query
//
// Frame lifecycle: press()/release() ... → query → clear_just_pressed()
//
// Every physical source holding an action is tracked, so aliases OR
// together: an action stays held until its last source is released.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

//=== Internal Dependencies ===============================================

use super::action::InputAction;
use super::event::PhysicalInput;

//=== InputState ==========================================================

/// Held and just-pressed actions for the current frame.
///
/// `just_pressed` is always a subset of `held`. A press and release that
/// both land inside one frame still produce one frame of `just_pressed`
/// (and `held`); the release is applied by
/// [`clear_just_pressed`](Self::clear_just_pressed).
#[derive(Debug, Default)]
pub struct InputState {
    //--- Persistent State (survives frame boundary) ----------------------
    held: HashSet<InputAction>,
    sources: HashMap<InputAction, HashSet<PhysicalInput>>,

    //--- Frame Deltas (reset by clear_just_pressed) ----------------------
    just_pressed: HashSet<InputAction>,
    released_this_frame: HashSet<InputAction>,
}

impl InputState {
    /// Creates an empty state: nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Event Application ------------------------------------------------

    /// Records `source` going down for `action`.
    ///
    /// Repeated presses of an already-down source (OS key repeat, GPIO
    /// chatter) are ignored.
    pub fn press(&mut self, action: InputAction, source: PhysicalInput) {
        let sources = self.sources.entry(action).or_default();
        if !sources.insert(source) {
            return;
        }

        self.released_this_frame.remove(&action);
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Records `source` going up for `action`.
    ///
    /// The action is cleared only when no other alias still holds it.
    pub fn release(&mut self, action: InputAction, source: PhysicalInput) {
        let Some(sources) = self.sources.get_mut(&action) else {
            return;
        };
        if !sources.remove(&source) || !sources.is_empty() {
            return;
        }

        if self.just_pressed.contains(&action) {
            // Tap shorter than a frame: keep it visible for this frame.
            self.released_this_frame.insert(action);
        } else {
            self.held.remove(&action);
        }
    }

    /// Releases every action, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.sources.clear();
        self.just_pressed.clear();
        self.released_this_frame.clear();
    }

    //--- Frame Boundary ---------------------------------------------------

    /// Ends the frame: forgets this frame's presses and applies releases
    /// that were deferred behind them.
    pub fn clear_just_pressed(&mut self) {
        self.just_pressed.clear();
        for action in self.released_this_frame.drain() {
            self.held.remove(&action);
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` on every frame the action is down, including the first.
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Returns `true` only on the frame the action went from up to down.
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Returns an iterator over all held actions.
    pub fn held(&self) -> impl Iterator<Item = &InputAction> {
        self.held.iter()
    }

    /// Returns an iterator over all actions pressed this frame.
    pub fn just_pressed(&self) -> impl Iterator<Item = &InputAction> {
        self.just_pressed.iter()
    }

    /// Returns `true` if any action was pressed this frame.
    pub fn any_just_pressed(&self) -> bool {
        !self.just_pressed.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::KeyCode;

    //--- Test Helpers -----------------------------------------------------

    fn key(code: KeyCode) -> PhysicalInput {
        PhysicalInput::Key(code)
    }

    //=====================================================================
    // Press / Release
    //=====================================================================

    #[test]
    fn enter_press_clear_release_scenario() {
        let mut state = InputState::new();
        assert!(!state.is_held(InputAction::Enter));
        assert!(!state.is_just_pressed(InputAction::Enter));

        state.press(InputAction::Enter, key(KeyCode::Enter));
        assert!(state.is_held(InputAction::Enter));
        assert!(state.is_just_pressed(InputAction::Enter));

        state.clear_just_pressed();
        assert!(state.is_held(InputAction::Enter));
        assert!(!state.is_just_pressed(InputAction::Enter));

        state.release(InputAction::Enter, key(KeyCode::Enter));
        assert!(!state.is_held(InputAction::Enter));
    }

    #[test]
    fn just_pressed_lasts_exactly_one_frame_while_held() {
        let mut state = InputState::new();
        state.press(InputAction::Up, key(KeyCode::ArrowUp));

        assert!(state.is_just_pressed(InputAction::Up));
        state.clear_just_pressed();
        assert!(!state.is_just_pressed(InputAction::Up));
        state.clear_just_pressed();
        assert!(!state.is_just_pressed(InputAction::Up));
        assert!(state.is_held(InputAction::Up));
    }

    #[test]
    fn repeated_press_of_held_source_is_ignored() {
        let mut state = InputState::new();
        state.press(InputAction::Down, key(KeyCode::ArrowDown));
        state.clear_just_pressed();

        state.press(InputAction::Down, key(KeyCode::ArrowDown));
        assert!(!state.is_just_pressed(InputAction::Down));
    }

    #[test]
    fn release_of_never_pressed_source_is_ignored() {
        let mut state = InputState::new();
        state.release(InputAction::Left, key(KeyCode::ArrowLeft));
        assert!(!state.is_held(InputAction::Left));
    }

    //=====================================================================
    // Alias OR Semantics
    //=====================================================================

    #[test]
    fn releasing_one_alias_keeps_action_held() {
        let mut state = InputState::new();
        state.press(InputAction::Up, key(KeyCode::ArrowUp));
        state.press(InputAction::Up, key(KeyCode::KeyW));
        state.clear_just_pressed();

        state.release(InputAction::Up, key(KeyCode::ArrowUp));
        assert!(state.is_held(InputAction::Up));

        state.release(InputAction::Up, key(KeyCode::KeyW));
        assert!(!state.is_held(InputAction::Up));
    }

    #[test]
    fn second_alias_does_not_retrigger_just_pressed() {
        let mut state = InputState::new();
        state.press(InputAction::Enter, key(KeyCode::Enter));
        state.clear_just_pressed();

        state.press(InputAction::Enter, key(KeyCode::Space));
        assert!(!state.is_just_pressed(InputAction::Enter));
    }

    #[test]
    fn gpio_and_keyboard_sources_share_an_action() {
        let mut state = InputState::new();
        state.press(InputAction::Enter, PhysicalInput::Pin(16));
        state.press(InputAction::Enter, key(KeyCode::Enter));
        state.release(InputAction::Enter, PhysicalInput::Pin(16));

        assert!(state.is_held(InputAction::Enter));
    }

    //=====================================================================
    // Sub-frame Taps
    //=====================================================================

    #[test]
    fn tap_within_one_frame_is_seen_for_that_frame() {
        let mut state = InputState::new();
        state.press(InputAction::Next, PhysicalInput::Pin(20));
        state.release(InputAction::Next, PhysicalInput::Pin(20));

        assert!(state.is_just_pressed(InputAction::Next));
        assert!(state.is_held(InputAction::Next));

        state.clear_just_pressed();
        assert!(!state.is_just_pressed(InputAction::Next));
        assert!(!state.is_held(InputAction::Next));
    }

    #[test]
    fn re_press_after_tap_in_same_frame_stays_held() {
        let mut state = InputState::new();
        state.press(InputAction::Next, PhysicalInput::Pin(20));
        state.release(InputAction::Next, PhysicalInput::Pin(20));
        state.press(InputAction::Next, PhysicalInput::Pin(20));

        state.clear_just_pressed();
        assert!(state.is_held(InputAction::Next));
    }

    #[test]
    fn just_pressed_is_subset_of_held() {
        let mut state = InputState::new();
        state.press(InputAction::Left, key(KeyCode::KeyA));
        state.press(InputAction::Right, key(KeyCode::KeyD));
        state.release(InputAction::Right, key(KeyCode::KeyD));

        for action in state.just_pressed() {
            assert!(state.is_held(*action));
        }
    }

    #[test]
    fn release_all_clears_everything() {
        let mut state = InputState::new();
        state.press(InputAction::Up, key(KeyCode::ArrowUp));
        state.press(InputAction::Down, key(KeyCode::ArrowDown));

        state.release_all();

        assert_eq!(state.held().count(), 0);
        assert!(!state.any_just_pressed());
    }
}
