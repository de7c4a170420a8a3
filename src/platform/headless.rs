//=========================================================================
// Headless Runner
//=========================================================================
//
// Frame loop for the embedded build: no window, GPIO buttons, frames
// handed to a `Presenter` (the LCD driver).
//
// Pacing is a plain sleep for the remainder of the frame period; a frame
// that runs long simply delays the next one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{GpioPoller, PlatformError};
use crate::core::scene::SceneKey;
use crate::core::TickControl;
use crate::engine::FrameDriver;
use crate::render::Canvas;

//=== Presenter ===========================================================

/// Receives every finished frame.
pub trait Presenter {
    fn present(&mut self, canvas: &Canvas) -> Result<(), PlatformError>;
}

/// Discards frames. Used when no display driver is attached.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _canvas: &Canvas) -> Result<(), PlatformError> {
        Ok(())
    }
}

//=== HeadlessRunner ======================================================

#[derive(Debug, Default)]
pub struct HeadlessRunner {
    gpio: Option<GpioPoller>,
    frame_limit: Option<u64>,
}

impl HeadlessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gpio(mut self, gpio: GpioPoller) -> Self {
        self.gpio = Some(gpio);
        self
    }

    /// Stops after `frames` frames even if no scene quits.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    //--- run() ------------------------------------------------------------
    //
    // Each frame:
    //  1. Poll GPIO into the input queue
    //  2. Tick the driver
    //  3. Present the canvas
    //  4. Sleep out the rest of the frame period
    //
    // Returns the number of frames presented.
    //
    pub fn run<S: SceneKey, R>(
        mut self,
        driver: &mut FrameDriver<S, R>,
        presenter: &mut dyn Presenter,
    ) -> Result<u64, PlatformError> {
        let period = driver.frame_period();
        let started = Instant::now();
        let mut frames = 0;

        info!(target: "platform", "Headless loop started ({:?} per frame)", period);

        loop {
            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                debug!(target: "platform", "Frame limit reached");
                driver.shutdown();
                break;
            }

            let frame_start = Instant::now();
            let now = started.elapsed();

            //--- Step 1: Gather input ------------------------------------
            if let Some(gpio) = self.gpio.as_mut() {
                gpio.poll(now);
            }

            //--- Step 2: Frame -------------------------------------------
            if driver.tick(now) == TickControl::Exit {
                break;
            }

            //--- Step 3: Present -----------------------------------------
            presenter.present(driver.canvas())?;
            frames += 1;

            //--- Step 4: Pacing ------------------------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
        }

        info!(target: "platform", "Headless loop exited after {} frames", frames);
        Ok(frames)
    }
}

/// Deadline of the frame after `previous`. A late frame pushes the next
/// one a full period past `now` instead of bursting to catch up.
pub(crate) fn next_deadline(previous: Instant, now: Instant, period: Duration) -> Instant {
    let next = previous + period;
    if next <= now {
        now + period
    } else {
        next
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
