//! Raw measurement, before any caching
//!
//! Two layers over the host primitive:
//!
//! - [`measure_raw_unadjusted`] asks the host and nothing more
//! - [`measure_raw_adjusted`] adds the word-spacing correction, which needs
//!   a second, unadjusted measurement of [`REFERENCE_GLYPH`]
//!
//! Widths from the correction are truncated toward zero at every step.

use crate::{
    error::{Result, TextRunError},
    style::ResolvedStyle,
    traits::MeasurementSurface,
    types::TextMetrics,
    NBSP,
};

/// Stand-in for an average letter when applying word spacing
pub const REFERENCE_GLYPH: &str = "O";

/// Replace whitespace so the host cannot collapse it
pub fn protect_whitespace(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_whitespace() { NBSP } else { ch })
        .collect()
}

/// Measure `text` exactly as the host reports it
pub fn measure_raw_unadjusted(
    surface: &dyn MeasurementSurface,
    text: &str,
    style: &ResolvedStyle,
) -> Result<TextMetrics> {
    let protected = protect_whitespace(text);
    let glyph_box = surface
        .measure_glyph_box(&protected, style)
        .map_err(|err| match err {
            TextRunError::MeasurementUnavailable(_) => err,
            other => TextRunError::MeasurementUnavailable(format!(
                "{} could not measure {:?}: {}",
                surface.name(),
                text,
                other
            )),
        })?;

    Ok(TextMetrics {
        width: glyph_box.width,
        height: glyph_box.height,
        ascent: glyph_box.ascent,
        descent: glyph_box.height - glyph_box.ascent,
    })
}

/// Correct a width for word spacing given the reference glyph width
///
/// `spaced = trunc(reference * percent / 100)`, and the truncated width
/// grows by `trunc(spaced - reference)`. The reference itself is used as
/// reported.
pub fn apply_word_spacing(width: f32, reference_width: f32, percent: f32) -> f32 {
    let spaced = (reference_width * percent / 100.0).trunc();
    let difference = (spaced - reference_width).trunc();
    width.trunc() + difference
}

/// Measure `text` and apply word spacing, if configured
pub fn measure_raw_adjusted(
    surface: &dyn MeasurementSurface,
    text: &str,
    style: &ResolvedStyle,
    word_spacing: Option<f32>,
) -> Result<TextMetrics> {
    let metrics = measure_raw_unadjusted(surface, text, style)?;
    match word_spacing {
        Some(percent) => {
            let reference = measure_raw_unadjusted(surface, REFERENCE_GLYPH, style)?;
            Ok(TextMetrics {
                width: apply_word_spacing(metrics.width, reference.width, percent),
                ..metrics
            })
        },
        None => Ok(metrics),
    }
}
