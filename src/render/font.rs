//=========================================================================
// Fonts
//=========================================================================
//
// Font styles and the built-in monospace faces they resolve to.
//
// Every face is a `'static` embedded-graphics mono font, so a `Font` is
// a copyable handle and never fails to load.
//
//=========================================================================

//=== External Dependencies ===============================================

use embedded_graphics::mono_font::{ascii, MonoFont};

//=== FontStyle ===========================================================

/// Weight of a text face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    Light,
    #[default]
    Regular,
    Bold,
    ExtraBold,
    Heavy,
}

impl FontStyle {
    fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::ExtraBold | Self::Heavy)
    }
}

//=== Face Tables =========================================================

// Sorted by glyph height.
const REGULAR_FACES: &[&MonoFont<'static>] = &[
    &ascii::FONT_4X6,
    &ascii::FONT_5X8,
    &ascii::FONT_6X10,
    &ascii::FONT_6X13,
    &ascii::FONT_7X14,
    &ascii::FONT_9X15,
    &ascii::FONT_9X18,
    &ascii::FONT_10X20,
];

const BOLD_FACES: &[&MonoFont<'static>] = &[
    &ascii::FONT_6X13_BOLD,
    &ascii::FONT_7X14_BOLD,
    &ascii::FONT_9X15_BOLD,
    &ascii::FONT_9X18_BOLD,
    &ascii::FONT_10X20,
];

//=== Font ================================================================

/// Handle to a resolved text face.
#[derive(Clone, Copy)]
pub struct Font {
    face: &'static MonoFont<'static>,
}

impl Font {
    /// Picks the face whose glyph height is closest to `size` pixels.
    ///
    /// Ties resolve to the smaller face.
    pub fn resolve(style: FontStyle, size: u32) -> Self {
        let faces = if style.is_bold() { BOLD_FACES } else { REGULAR_FACES };

        let mut best = faces[0];
        for face in faces.iter().copied() {
            let distance = face.character_size.height.abs_diff(size);
            if distance < best.character_size.height.abs_diff(size) {
                best = face;
            }
        }

        Self { face: best }
    }

    pub fn mono(&self) -> &'static MonoFont<'static> {
        self.face
    }

    /// Glyph height in pixels.
    pub fn line_height(&self) -> u32 {
        self.face.character_size.height
    }

    /// Width of `text` in pixels when drawn with this face.
    pub fn text_width(&self, text: &str) -> u32 {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return 0;
        }
        chars * self.face.character_size.width + (chars - 1) * self.face.character_spacing
    }
}

impl Default for Font {
    fn default() -> Self {
        Self { face: &ascii::FONT_6X10 }
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("width", &self.face.character_size.width)
            .field("height", &self.face.character_size.height)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
