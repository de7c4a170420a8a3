//=========================================================================
// Services
//
// Collaborators the scenes call through narrow interfaces.
//
// Architecture:
//   AudioService   ── ShellAudio (aplay child processes) | SilentAudio
//   GameStore      ── JsonStore (file-backed)            | MemoryStore
//   ResourceLoader ── images from disk or zip, built-in fonts
//
// Every failure below these interfaces degrades (silence, empty results,
// placeholder art) instead of reaching the frame loop as an error.
//
//=========================================================================

pub mod audio;
pub mod resources;
pub mod store;

pub use audio::{AudioService, ShellAudio, SilentAudio, Track, Volumes};
pub use resources::{ImageHandle, ResourceError, ResourceLoader};
pub use store::{GameStore, JsonStore, MemoryStore, StoreError};
