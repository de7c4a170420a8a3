//=========================================================================
// Desktop Runner
//=========================================================================
//
// Development build: a Winit window showing the canvas through a
// `pixels` surface, magnified by `display.scale`, with the keyboard as
// input.
//
// Pacing uses `ControlFlow::WaitUntil` on the next frame deadline; the
// frame itself runs in `about_to_wait`, and presentation happens on the
// `RedrawRequested` it triggers.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Instant;

use log::*;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use super::headless::next_deadline;
use super::input_processor::InputProcessor;
use super::PlatformError;
use crate::config::DisplayConfig;
use crate::core::input::InputSource;
use crate::core::scene::SceneKey;
use crate::core::TickControl;
use crate::engine::FrameDriver;

//=== run_desktop() =======================================================

/// Runs the frame driver inside a desktop window until the window is
/// closed or a scene quits.
pub fn run_desktop<S: SceneKey, R>(
    driver: &mut FrameDriver<S, R>,
    display: &DisplayConfig,
) -> Result<(), PlatformError> {
    debug!(target: "platform", "Starting Winit event loop");

    let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
    let mut app = DesktopApp::new(driver, display);

    event_loop.run_app(&mut app).map_err(PlatformError::EventLoopExecution)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

//=== DesktopApp ==========================================================

struct DesktopApp<'d, S: SceneKey, R> {
    driver: &'d mut FrameDriver<S, R>,
    title: String,
    scale: u32,

    /// Created lazily in `resumed()`.
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,

    processor: InputProcessor,
    source: InputSource,

    started: Instant,
    next_frame: Instant,
    error: Option<PlatformError>,
}

impl<'d, S: SceneKey, R> DesktopApp<'d, S, R> {
    fn new(driver: &'d mut FrameDriver<S, R>, display: &DisplayConfig) -> Self {
        let source = driver.input_source();
        let now = Instant::now();
        Self {
            driver,
            title: display.title.clone(),
            scale: display.scale.max(1),
            window: None,
            pixels: None,
            processor: InputProcessor::new(),
            source,
            started: now,
            next_frame: now,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: PlatformError) {
        error!(target: "platform", "{}", error);
        self.error = Some(error);
        self.driver.shutdown();
        event_loop.exit();
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let (width, height) = (self.driver.canvas().width(), self.driver.canvas().height());

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(width * self.scale, height * self.scale))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(attrs).map_err(PlatformError::WindowCreation)?);
        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(width, height, surface).map_err(PlatformError::Surface)?;

        window.request_redraw();
        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        let Some(pixels) = self.pixels.as_mut() else {
            return Ok(());
        };
        pixels.frame_mut().copy_from_slice(self.driver.canvas().as_rgba());
        pixels.render().map_err(PlatformError::Render)
    }
}

//=== Winit Integration ===================================================

impl<S: SceneKey, R> ApplicationHandler for DesktopApp<'_, S, R> {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists");
            return;
        }

        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.driver.shutdown();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.processor.process_key_event(&key_event) {
                    self.source.send(event);
                } else {
                    trace!(target: "platform::input", "Key ignored: {:?}", key_event.physical_key);
                }
            }

            WindowEvent::Focused(false) => {
                debug!(target: "platform::input", "Window lost focus, releasing held keys");
                self.driver.release_all_input();
            }

            WindowEvent::Resized(size) => {
                if let Some(pixels) = self.pixels.as_mut() {
                    if let Err(e) = pixels.resize_surface(size.width.max(1), size.height.max(1)) {
                        warn!(target: "platform", "Surface resize failed: {}", e);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.present() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }

    /// Runs a frame once its deadline has passed, then sleeps until the next.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        let now = Instant::now();
        if now >= self.next_frame {
            if self.driver.tick(self.started.elapsed()) == TickControl::Exit {
                info!(target: "platform", "Quit requested, closing window");
                event_loop.exit();
                return;
            }
            self.next_frame = next_deadline(self.next_frame, now, self.driver.frame_period());

            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
