//=========================================================================
// Platform Subsystem
//
// Connects the frame driver to the machine it runs on.
//
// Architecture:
// ```text
//  Desktop (development):            Embedded (Raspberry Pi):
//  ┌──────────────────────────┐     ┌──────────────────────────┐
//  │  Winit Event Loop        │     │  Paced sleep loop        │
//  │   ↓ KeyboardInput        │     │   ↓ every frame          │
//  │  InputProcessor          │     │  GpioPoller (sysfs)      │
//  │   ↓                      │     │   ↓                      │
//  │  InputSource ──┐         │     │  InputSource ──┐         │
//  │                ↓         │     │                ↓         │
//  │  FrameDriver::tick()     │     │  FrameDriver::tick()     │
//  │   ↓                      │     │   ↓                      │
//  │  pixels surface (scaled) │     │  Presenter (LCD)         │
//  └──────────────────────────┘     └──────────────────────────┘
// ```
//
// Both runners share one thread with the frame driver. Input adapters
// push into the driver's queue; the driver drains it at the start of
// each frame.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod gpio;
mod headless;
mod input_processor;
mod window;

//=== Public API ==========================================================

pub use gpio::{bind_buttons, GpioPoller};
pub use headless::{HeadlessRunner, NullPresenter, Presenter};
pub use window::run_desktop;

//=== External Crates =====================================================

use std::path::Path;

use log::info;
use thiserror::Error;

//=== Internal Imports ====================================================

use crate::config::PlatformChoice;

/// Device-tree model string, present on Raspberry Pi boards.
const DEVICE_MODEL_PATH: &str = "/proc/device-tree/model";

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop, window or display the frame
/// loop cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error (rare, indicates corruption).
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[source] winit::error::OsError),

    #[error("failed to create pixel surface: {0}")]
    Surface(#[source] pixels::Error),

    #[error("failed to present frame: {0}")]
    Render(#[source] pixels::Error),

    /// A headless presenter could not write the frame.
    #[error("display error: {0}")]
    Display(String),
}

//=== Platform Detection ==================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Winit window and keyboard.
    Desktop,

    /// Headless loop, GPIO buttons.
    Embedded,
}

/// Resolves the configured platform, probing the hardware for `Auto`.
pub fn detect(choice: PlatformChoice) -> PlatformKind {
    let kind = match choice {
        PlatformChoice::Desktop => PlatformKind::Desktop,
        PlatformChoice::Embedded => PlatformKind::Embedded,
        PlatformChoice::Auto if is_raspberry_pi(Path::new(DEVICE_MODEL_PATH)) => PlatformKind::Embedded,
        PlatformChoice::Auto => PlatformKind::Desktop,
    };
    info!(target: "platform", "Platform: {:?} (configured {:?})", kind, choice);
    kind
}

fn is_raspberry_pi(model_path: &Path) -> bool {
    std::fs::read(model_path)
        .map(|bytes| String::from_utf8_lossy(&bytes).contains("Raspberry Pi"))
        .unwrap_or(false)
}

//=========================================================================
// Unit Tests
//=========================================================================
