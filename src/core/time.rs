//=========================================================================
// Frame Time
//=========================================================================
//
// Explicit per-frame timing threaded from the frame driver into scenes,
// components and timers. Nothing below the driver reads a wall clock.
//
// Architecture:
//   FrameDriver ──tick(now)──> FrameTime { delta, elapsed, frame }
//                                 │
//                                 ├─► Scene::update / RenderObject::update
//                                 ├─► RenderObject::draw (animation phase)
//                                 └─► IntervalTimer::tick
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== FrameTime ===========================================================

/// Timing snapshot for a single frame.
///
/// `elapsed` is measured from the first frame of the driver, `delta` from
/// the previous frame. Both are zero on the very first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    pub delta: Duration,
    pub elapsed: Duration,
    pub frame: u64,
}

impl FrameTime {
    /// Time value of the first frame.
    pub const ZERO: FrameTime = FrameTime {
        delta: Duration::ZERO,
        elapsed: Duration::ZERO,
        frame: 0,
    };

    pub fn new(delta: Duration, elapsed: Duration, frame: u64) -> Self {
        Self { delta, elapsed, frame }
    }

    /// Builds a time value at a given offset from startup, with no delta.
    ///
    /// Mostly useful for tests and for scenes reacting to an absolute time.
    pub fn at(elapsed: Duration) -> Self {
        Self { delta: Duration::ZERO, elapsed, frame: 0 }
    }

    /// Returns the time of the next frame, `delta` later.
    pub fn advanced(self, delta: Duration) -> Self {
        Self {
            delta,
            elapsed: self.elapsed + delta,
            frame: self.frame + 1,
        }
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

//=== IntervalTimer =======================================================

/// Periodic trigger driven by [`FrameTime`].
///
/// Fires at most once per [`tick`](Self::tick). Missed periods (a long
/// frame) are skipped instead of replayed, and the next deadline is the
/// previous deadline plus the period so firing does not drift with frame
/// jitter.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next_due: Option<Duration>,
}

impl IntervalTimer {
    /// Creates a stopped timer.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "Timer period must be positive");
        Self { period, next_due: None }
    }

    /// Arms the timer; the first tick fires one period after `now`.
    pub fn start(&mut self, now: &FrameTime) {
        self.next_due = Some(now.elapsed + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` if the deadline has passed, and re-arms the timer.
    pub fn tick(&mut self, now: &FrameTime) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };

        if now.elapsed < due {
            return false;
        }

        let mut next = due + self.period;
        while next <= now.elapsed {
            next += self.period;
        }
        self.next_due = Some(next);
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
