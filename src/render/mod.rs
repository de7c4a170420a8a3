//=========================================================================
// Rendering Surface
//
// The raster canvas scenes draw into, plus the font handles used for
// text. Rasterisation is delegated to embedded-graphics; presentation
// (window or LCD) lives in `platform`.
//
//=========================================================================

mod canvas;
mod font;

pub use canvas::Canvas;
pub use font::{Font, FontStyle};

/// Re-exported geometry and colour types used by render objects.
pub use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb888, RgbColor},
    primitives::Rectangle,
};
