//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, lazy construction and the active scene.
//
// Scenes are registered as factories keyed by id. The first switch to an
// id builds the scene and caches it; later switches reuse the cached
// instance, so scenes keep their construction-time resources between
// visits while `on_enter` rebuilds per-visit state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneArgs, SceneContext};
use crate::core::time::FrameTime;
use crate::core::TickControl;
use crate::render::Canvas;

//=== Scene Transition ====================================================

/// A request queued by a scene, applied by the manager between phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Exits the current scene and enters the given one.
    Switch(K, SceneArgs),

    /// Stops the frame loop.
    Quit,
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the SceneManager's registry.
/// Typically implemented by an application enum.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Scene Factory =======================================================

/// Builds a scene on first use. Receives the service bundle so scenes can
/// load resources once at construction.
pub type SceneFactory<S, R> = Box<dyn Fn(&mut R) -> Box<dyn Scene<S, R>>>;

/// Upper bound on switch rounds per frame. A scene may redirect from
/// `on_enter` (missing arguments); a loop of redirects is cut off here.
const MAX_CHAINED_TRANSITIONS: usize = 8;

//=== Scene Manager =======================================================

/// Owns every scene and sequences their lifecycle.
///
/// At most one scene is current. Every switch runs the old scene's
/// `on_exit` to completion before the new scene's `on_enter` starts.
pub struct SceneManager<S: SceneKey, R> {
    registry: HashMap<S, SceneFactory<S, R>>,
    cache: HashMap<S, Box<dyn Scene<S, R>>>,
    current: Option<S>,
}

impl<S: SceneKey, R> SceneManager<S, R> {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no registered scenes and no current scene.
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            cache: HashMap::new(),
            current: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers the factory for `key`.
    ///
    /// The factory runs at most once, on the first switch to `key`.
    pub fn register_scene<F>(&mut self, key: S, factory: F)
    where
        F: Fn(&mut R) -> Box<dyn Scene<S, R>> + 'static,
    {
        if self.registry.insert(key, Box::new(factory)).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
            self.cache.remove(&key);
        }
    }

    //--- switch_scene() ---------------------------------------------------
    //
    // 1. Reject unknown ids (logged, current scene kept)
    // 2. Build and cache the target on first use
    // 3. Exit the current scene
    // 4. Make the target current
    // 5. Enter the target with `args`
    //
    // Returns `false` if the switch was rejected.
    //
    pub fn switch_scene(&mut self, key: S, args: &SceneArgs, ctx: &mut SceneContext<'_, S, R>) -> bool {
        let Some(factory) = self.registry.get(&key) else {
            warn!("Attempted to switch to unregistered scene {:?}", key);
            return false;
        };

        if !self.cache.contains_key(&key) {
            debug!("Constructing scene {:?}", key);
            let scene = factory(ctx.services);
            self.cache.insert(key, scene);
        }

        if let Some(previous) = self.current {
            if let Some(scene) = self.cache.get_mut(&previous) {
                debug!("Exiting scene {:?}", previous);
                scene.on_exit(ctx);
            }
        }

        info!("Switching scene {:?} -> {:?}", self.current, key);
        self.current = Some(key);

        if let Some(scene) = self.cache.get_mut(&key) {
            scene.on_enter(ctx, args);
        }

        true
    }

    //--- Transition Processing --------------------------------------------

    /// Applies every queued transition, including ones queued by the
    /// scenes being entered.
    ///
    /// Returns [`TickControl::Exit`] if a quit was requested.
    pub fn process_transitions(&mut self, ctx: &mut SceneContext<'_, S, R>) -> TickControl {
        for _ in 0..MAX_CHAINED_TRANSITIONS {
            let pending = ctx.transitions.take();
            if pending.is_empty() {
                return TickControl::Continue;
            }

            for transition in pending {
                match transition {
                    SceneTransition::Switch(key, args) => {
                        self.switch_scene(key, &args, ctx);
                    }
                    SceneTransition::Quit => {
                        info!("Quit requested");
                        ctx.transitions.clear();
                        return TickControl::Exit;
                    }
                }
            }
        }

        if !ctx.transitions.is_empty() {
            warn!(
                "Dropping {} scene transitions after {} chained rounds",
                ctx.transitions.len(),
                MAX_CHAINED_TRANSITIONS
            );
            ctx.transitions.clear();
        }

        TickControl::Continue
    }

    /// Exits the current scene without entering another. Used at shutdown.
    pub fn shutdown(&mut self, ctx: &mut SceneContext<'_, S, R>) {
        if let Some(key) = self.current.take() {
            if let Some(scene) = self.cache.get_mut(&key) {
                debug!("Exiting scene {:?} for shutdown", key);
                scene.on_exit(ctx);
            }
        }
    }

    //--- Frame Delegation -------------------------------------------------

    pub fn handle_input(&mut self, ctx: &mut SceneContext<'_, S, R>) {
        if let Some(scene) = self.current_scene_mut() {
            scene.handle_input(ctx);
        }
    }

    pub fn update(&mut self, ctx: &mut SceneContext<'_, S, R>) {
        if let Some(scene) = self.current_scene_mut() {
            scene.update(ctx);
        }
    }

    pub fn draw(&self, canvas: &mut Canvas, time: &FrameTime) {
        if let Some(scene) = self.current.and_then(|key| self.cache.get(&key)) {
            scene.draw(canvas, time);
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn is_registered(&self, key: S) -> bool {
        self.registry.contains_key(&key)
    }

    pub fn is_cached(&self, key: S) -> bool {
        self.cache.contains_key(&key)
    }

    //--- Internal Helpers -------------------------------------------------

    fn current_scene_mut(&mut self) -> Option<&mut Box<dyn Scene<S, R>>> {
        let key = self.current?;
        self.cache.get_mut(&key)
    }
}

impl<S: SceneKey, R> Default for SceneManager<S, R> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
