//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use mushitroom::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Frame driver
pub use crate::core::TickControl;
pub use crate::engine::{EngineBuilder, FrameDriver};

// Input system
pub use crate::core::input::{InputAction, InputSource, InputState, KeyCode, PhysicalInput};

// Scene system
pub use crate::core::scene::{Scene, SceneArgs, SceneContext, SceneKey, SceneTransition};

// UI
pub use crate::core::ui::{Cursor, CursorMode, FocusableComponent, RenderObject, UiComponentManager};

// Time
pub use crate::core::time::{FrameTime, IntervalTimer};

// Rendering
pub use crate::render::{Canvas, Font, FontStyle, Point, Rectangle, Rgb888, RgbColor, Size};
