//! The two host seams
//!
//! - [`MeasurementSurface`] - boxes a string under a style
//! - [`DrawSurface`] - a 2D canvas with a fill color, a font and text
//!
//! Swap either implementation and nothing above it notices.

use crate::{error::Result, style::ResolvedStyle, types::GlyphBox};
use serde::{Deserialize, Serialize};

/// The expensive host call everything else memoizes
///
/// Implementations report the laid-out box of `text` rendered with `style`:
/// its width, its height, and how far the baseline sits below the top.
/// Whitespace has already been replaced with non-breaking spaces by the
/// time this is called.
///
/// ```ignore
/// struct FixedAdvance;
///
/// impl MeasurementSurface for FixedAdvance {
///     fn name(&self) -> &'static str {
///         "fixed"
///     }
///
///     fn measure_glyph_box(&self, text: &str, style: &ResolvedStyle) -> Result<GlyphBox> {
///         let em = style.size * 96.0 / 72.0;
///         Ok(GlyphBox {
///             ascent: (em * 0.8).round(),
///             height: em.round(),
///             width: (text.chars().count() as f32 * em * 0.5).round(),
///         })
///     }
/// }
/// ```
pub trait MeasurementSurface: Send + Sync {
    /// Used in logs and error messages
    fn name(&self) -> &'static str;

    /// Measure the rendered box of `text`
    ///
    /// Faults are reported as errors; the measurer converts them into
    /// [`TextRunError::MeasurementUnavailable`](crate::TextRunError::MeasurementUnavailable).
    fn measure_glyph_box(&self, text: &str, style: &ResolvedStyle) -> Result<GlyphBox>;
}

/// Horizontal anchor of `fill_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of `fill_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

/// Where styled runs end up
///
/// The shape follows a 2D canvas context: state setters followed by fill
/// calls that use that state.
pub trait DrawSurface {
    /// Color used by every following fill, as written in the run
    fn set_fill_color(&mut self, color: &str);

    /// Font used by every following `fill_text`
    fn set_font(&mut self, style: &ResolvedStyle);

    fn set_text_align(&mut self, align: TextAlign);

    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// Draw `text` anchored at `(x, y)`
    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()>;

    /// Fill an axis-aligned rectangle with the current fill color
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()>;
}
