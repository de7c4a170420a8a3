//=========================================================================
// Frame Driver
//
// Main entry point and per-frame coordinator.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  FrameDriver  ──tick()──>  [one frame]
//         │                          │
//         ├─ with_fps()              ├─ init(): register scenes
//         ├─ with_canvas_size()      ├─ start(): enter the first scene
//         ├─ with_background()       └─ shutdown(): exit the last scene
//         └─ with_mapper()
// ```
//
// Frame order:
//   pump input → handle_input → transitions → update → transitions
//     → clear canvas → draw → end_frame (clear just-pressed)
//
// The driver never reads the clock itself. Runners (desktop window,
// headless loop) pass the time since startup into `tick()`, which keeps
// every frame reproducible in tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::input::{ActionMapper, InputSource, InputSystem};
use crate::core::scene::{SceneArgs, SceneContext, SceneKey, SceneManager, TransitionQueue};
use crate::core::time::FrameTime;
use crate::core::TickControl;
use crate::render::{Canvas, Rgb888, RgbColor};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing a [`FrameDriver`].
///
/// # Default Values
///
/// - **FPS**: 24.0
/// - **Canvas**: 320 x 240, white background
/// - **Input queue capacity**: 64 events
/// - **Bindings**: [`ActionMapper::keyboard_defaults`]
///
/// # Examples
///
/// ```no_run
/// use mushitroom::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Main }
/// impl SceneKey for Screen {}
///
/// let driver = EngineBuilder::<Screen, ()>::new()
///     .with_fps(30.0)
///     .with_canvas_size(160, 128)
///     .build(());
/// ```
pub struct EngineBuilder<S: SceneKey, R> {
    fps: f64,
    width: u32,
    height: u32,
    background: Rgb888,
    input_capacity: usize,
    mapper: ActionMapper,
    _phantom: std::marker::PhantomData<(S, R)>,
}

impl<S: SceneKey, R> EngineBuilder<S, R> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            fps: 24.0,
            width: 320,
            height: 240,
            background: Rgb888::WHITE,
            input_capacity: 64,
            mapper: ActionMapper::keyboard_defaults(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the target frame rate.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        self.fps = fps;
        self
    }

    /// Sets the canvas size in pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Canvas size must be positive");
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_background(mut self, background: Rgb888) -> Self {
        self.background = background;
        self
    }

    /// Sets how many physical events may queue up between two frames.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_input_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Input queue capacity must be positive");
        self.input_capacity = capacity;
        self
    }

    /// Replaces the default keyboard bindings.
    pub fn with_mapper(mut self, mapper: ActionMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Builds the driver around the application's service bundle.
    pub fn build(self, services: R) -> FrameDriver<S, R> {
        info!(
            "Building frame driver (FPS: {}, canvas: {}x{}, bindings: {})",
            self.fps,
            self.width,
            self.height,
            self.mapper.len()
        );

        FrameDriver {
            input: InputSystem::new(self.mapper, self.input_capacity),
            scenes: SceneManager::new(),
            transitions: TransitionQueue::new(),
            services,
            canvas: Canvas::new(self.width, self.height, self.background),
            time: FrameTime::ZERO,
            started: false,
            frame_period: Duration::from_secs_f64(1.0 / self.fps),
        }
    }
}

impl<S: SceneKey, R> Default for EngineBuilder<S, R> {
    fn default() -> Self {
        Self::new()
    }
}

//=== FrameDriver =========================================================

/// Owns the input system, the scene manager, the services and the canvas,
/// and runs them in a fixed order once per frame.
pub struct FrameDriver<S: SceneKey, R> {
    input: InputSystem,
    scenes: SceneManager<S, R>,
    transitions: TransitionQueue<S>,
    services: R,
    canvas: Canvas,
    time: FrameTime,
    started: bool,
    frame_period: Duration,
}

impl<S: SceneKey, R> FrameDriver<S, R> {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the scene manager for registration.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneManager<S, R>),
    {
        info!("Registering scenes");
        init_fn(&mut self.scenes);
        self
    }

    /// Enters the first scene. Transitions it queues are applied at once.
    pub fn start(&mut self, scene: S, args: SceneArgs) -> TickControl {
        let mut ctx = SceneContext::new(self.input.state(), self.time, &mut self.transitions, &mut self.services);
        self.scenes.switch_scene(scene, &args, &mut ctx);
        self.scenes.process_transitions(&mut ctx)
    }

    //--- tick() -----------------------------------------------------------
    //
    // Runs one frame at `now`, the time since the runner started.
    //
    // 1. Advance frame time
    // 2. Pump queued physical input into the input state
    // 3. Scene input, then apply transitions
    // 4. Scene update, then apply transitions
    // 5. Clear and draw the canvas
    // 6. Clear just-pressed
    //
    // Returns `TickControl::Exit` once a scene requested quit; the last
    // scene has been exited by then.
    //
    pub fn tick(&mut self, now: Duration) -> TickControl {
        //--- Step 1: Frame time --------------------------------------------
        self.time = if self.started {
            self.time.advanced(now.saturating_sub(self.time.elapsed))
        } else {
            self.started = true;
            FrameTime::new(Duration::ZERO, now, 0)
        };

        //--- Step 2: Input -------------------------------------------------
        self.input.pump();

        //--- Steps 3-4: Scene logic ----------------------------------------
        let control = {
            let mut ctx =
                SceneContext::new(self.input.state(), self.time, &mut self.transitions, &mut self.services);

            self.scenes.handle_input(&mut ctx);
            match self.scenes.process_transitions(&mut ctx) {
                TickControl::Exit => TickControl::Exit,
                TickControl::Continue => {
                    self.scenes.update(&mut ctx);
                    self.scenes.process_transitions(&mut ctx)
                }
            }
        };

        if control == TickControl::Exit {
            self.shutdown();
            return TickControl::Exit;
        }

        //--- Step 5: Draw --------------------------------------------------
        self.canvas.clear();
        self.scenes.draw(&mut self.canvas, &self.time);

        //--- Step 6: Close the frame ---------------------------------------
        self.input.end_frame();

        TickControl::Continue
    }

    /// Releases every held action, e.g. when the window loses focus.
    pub fn release_all_input(&mut self) {
        debug!("Releasing all held input");
        self.input.release_all();
    }

    /// Exits the current scene. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.scenes.current().is_none() {
            return;
        }
        debug!("Frame driver shutting down at frame {}", self.time.frame);
        let mut ctx = SceneContext::new(self.input.state(), self.time, &mut self.transitions, &mut self.services);
        self.scenes.shutdown(&mut ctx);
        self.transitions.clear();
    }

    //--- Accessors --------------------------------------------------------

    /// A new handle for an input adapter.
    pub fn input_source(&self) -> InputSource {
        self.input.source()
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn scenes(&self) -> &SceneManager<S, R> {
        &self.scenes
    }

    pub fn current_scene(&self) -> Option<S> {
        self.scenes.current()
    }

    pub fn services(&self) -> &R {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut R {
        &mut self.services
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Target duration of one frame.
    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
