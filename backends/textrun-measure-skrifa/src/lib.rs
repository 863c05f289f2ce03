//! Skrifa Measurer - text boxes straight from font metrics
//!
//! A browser answers "how big is this text" by laying it out. Here we ask
//! the font: advances for the width, the face's ascender and descender for
//! the height. Results are snapped to whole pixels the way a layout engine
//! reports box offsets.

use std::borrow::Cow;
use std::sync::Arc;

use textrun_core::{
    error::Result, types::GlyphBox, MeasurementSurface, ResolvedStyle, TextRunError, NBSP,
};
use textrun_fontdb::{FontBook, FontFace};

/// CSS reference pixel density
pub const DEFAULT_DPI: f32 = 96.0;

/// Measures with faces from a [`FontBook`]
pub struct SkrifaMeasurer {
    fonts: Arc<FontBook>,
    dpi: f32,
}

impl SkrifaMeasurer {
    pub fn new(fonts: Arc<FontBook>) -> Self {
        Self::with_dpi(fonts, DEFAULT_DPI)
    }

    pub fn with_dpi(fonts: Arc<FontBook>, dpi: f32) -> Self {
        Self { fonts, dpi }
    }

    pub fn fonts(&self) -> &Arc<FontBook> {
        &self.fonts
    }

    /// Pixels per em for a size in points
    pub fn pixels_per_em(&self, points: f32) -> f32 {
        points * self.dpi / 72.0
    }

    fn text_width(face: &FontFace, text: &str, px: f32) -> f32 {
        // NBSP is often unmapped; it advances like a space
        let text = if text.contains(NBSP) && face.glyph_id(NBSP).is_none() {
            Cow::Owned(text.replace(NBSP, " "))
        } else {
            Cow::Borrowed(text)
        };
        face.advance_width(&text, px)
    }
}

impl MeasurementSurface for SkrifaMeasurer {
    fn name(&self) -> &'static str {
        "skrifa"
    }

    fn measure_glyph_box(&self, text: &str, style: &ResolvedStyle) -> Result<GlyphBox> {
        let face = self.fonts.resolve_style(style).ok_or_else(|| {
            TextRunError::MeasurementUnavailable(format!("no face for {}", style.family))
        })?;

        let px = self.pixels_per_em(style.size);
        let metrics = face.vertical_metrics(px);
        let ascent = metrics.ascent.round();
        let height = (metrics.ascent + metrics.descent).round();
        let width = Self::text_width(&face, text, px).round();

        log::trace!(
            "skrifa: {:?} in {} at {}px -> {}x{} (ascent {})",
            text,
            face.family(),
            px,
            width,
            height,
            ascent
        );

        Ok(GlyphBox {
            ascent,
            height,
            width,
        })
    }
}
