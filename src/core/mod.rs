//=========================================================================
// Core Systems
//
// Platform-independent engine pieces that run on the frame thread.
//
// Responsibilities:
// - Input: physical events → logical actions → per-frame `InputState`
// - Scenes: registration, lazy construction, exit/enter sequencing
// - UI: focusable components and the focus state machine
// - Time: frame timing and interval timers threaded into scenes
//
// Notes:
// Nothing in here reads the wall clock or touches the OS. The frame
// driver (`crate::engine`) owns the instances and feeds them time and
// input once per frame.
//
//=========================================================================

pub mod input;
pub mod scene;
pub mod time;
pub mod ui;

//=== TickControl =========================================================
//
// Defines control flow for the frame loop.
// Each frame can signal either to continue or terminate the loop.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}
