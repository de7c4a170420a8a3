//=========================================================================
// Mushitroom — Library Root
//
// A tiny virtual-pet appliance: a scene and focus-navigation engine
// driven by three or four buttons, drawing a 320x240 canvas to a
// Raspberry Pi LCD or a desktop window.
//
// Layers:
// - `core`      engine: input, scenes, focus-navigable UI, frame time
// - `render`    the RGBA canvas and fonts
// - `services`  audio, persistence and asset loading
// - `platform`  keyboard / GPIO input and the window / headless runners
// - `game`      the five scenes of the pet game and their data model
//
// Typical usage:
// ```no_run
// use mushitroom::game::{register_scenes, SceneId, Services};
// use mushitroom::prelude::*;
// use mushitroom::services::{MemoryStore, ResourceLoader, SilentAudio};
//
// let services = Services::new(
//     Box::new(SilentAudio::new()),
//     Box::new(MemoryStore::new()),
//     ResourceLoader::new("assets"),
//     Size::new(320, 240),
// );
// let mut driver = EngineBuilder::new().build(services).init(register_scenes);
// driver.start(SceneId::Title, SceneArgs::new());
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod config;
pub mod core;
pub mod engine;
pub mod game;
pub mod platform;
pub mod prelude;
pub mod render;
pub mod services;

//--- Public Exports ------------------------------------------------------

pub use engine::{EngineBuilder, FrameDriver};
