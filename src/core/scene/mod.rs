//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene lifecycle and single-active-scene switching.
//
// Architecture:
//   SceneManager
//     ├─ registry: HashMap<S, factory>         (fixed at startup)
//     ├─ cache:    HashMap<S, Box<dyn Scene>>  (lazy, never evicted)
//     └─ current:  Option<S>
//
// Flow (per frame):
//   handle_input() → process_transitions() → update() → process_transitions() → draw()
//
// Scenes see the manager only through `SceneContext`, which queues switch
// requests on a `TransitionQueue`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputState;
use crate::core::time::FrameTime;
use crate::render::Canvas;

//=== Module Declarations =================================================

mod args;
mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use args::SceneArgs;
pub use scene_manager::{SceneFactory, SceneKey, SceneManager, SceneTransition};
pub use transition_queue::TransitionQueue;

//=== SceneContext ========================================================

/// Everything a scene may touch during a lifecycle call.
///
/// `R` is the application's service bundle (audio, persistence,
/// resources). Input is read-only; scene switches are requests.
pub struct SceneContext<'a, S: SceneKey, R> {
    pub input: &'a InputState,
    pub time: FrameTime,
    pub transitions: &'a mut TransitionQueue<S>,
    pub services: &'a mut R,
}

impl<'a, S: SceneKey, R> SceneContext<'a, S, R> {
    pub fn new(
        input: &'a InputState,
        time: FrameTime,
        transitions: &'a mut TransitionQueue<S>,
        services: &'a mut R,
    ) -> Self {
        Self { input, time, transitions, services }
    }

    /// Requests a switch to `scene`, performed at the frame boundary.
    pub fn switch_scene(&mut self, scene: S, args: SceneArgs) {
        self.transitions.switch_scene(scene, args);
    }

    /// Requests application shutdown.
    pub fn quit(&mut self) {
        self.transitions.quit();
    }
}

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks, input, update and draw.
///
/// A scene instance is built once and re-entered any number of times, so
/// `on_enter` must rebuild all per-visit state and `on_exit` must stop
/// everything `on_enter` started.
///
/// # Minimal Implementation
///
/// ```rust
/// # use mushitroom::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Main }
/// # impl SceneKey for Screen {}
/// struct MainScene;
///
/// impl Scene<Screen, ()> for MainScene {
///     fn handle_input(&mut self, ctx: &mut SceneContext<'_, Screen, ()>) {
///         if ctx.input.is_just_pressed(InputAction::Escape) {
///             ctx.quit();
///         }
///     }
///
///     fn draw(&self, _canvas: &mut Canvas, _time: &FrameTime) {}
/// }
/// ```
pub trait Scene<S: SceneKey, R> {
    /// Called each time the scene becomes current.
    ///
    /// Default implementation does nothing.
    fn on_enter(&mut self, _ctx: &mut SceneContext<'_, S, R>, _args: &SceneArgs) {}

    /// Called when another scene replaces this one.
    ///
    /// Default implementation does nothing.
    fn on_exit(&mut self, _ctx: &mut SceneContext<'_, S, R>) {}

    /// Translates this frame's input into navigation and switch requests.
    fn handle_input(&mut self, ctx: &mut SceneContext<'_, S, R>);

    /// Per-frame state advance, called every frame after input.
    fn update(&mut self, _ctx: &mut SceneContext<'_, S, R>) {}

    /// Draws the current state. Must not change game state.
    fn draw(&self, canvas: &mut Canvas, time: &FrameTime);
}
