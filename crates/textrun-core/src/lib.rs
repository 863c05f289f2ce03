//! Textrun Core: styled runs in, pixel metrics out
//!
//! A run is a span of text that shares one set of formatting attributes.
//! This crate turns runs into two things a layout engine needs:
//!
//! 1. **Metrics** - width, height, ascent and descent in pixels, memoized
//!    because asking the host how big some text is costs far more than
//!    anything else we do
//! 2. **Drawing** - fill color, font, glyphs and decorations pushed onto a
//!    2D surface at a baseline the caller chose
//!
//! ## Measure Your First Run
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use textrun_core::{FormattingContext, Run, TextMeasurer};
//! # use textrun_core::{MeasurementSurface, ResolvedStyle, types::GlyphBox};
//! # struct HostSurface;
//! # impl MeasurementSurface for HostSurface {
//! #     fn name(&self) -> &'static str { "host" }
//! #     fn measure_glyph_box(&self, _: &str, _: &ResolvedStyle)
//! #         -> textrun_core::Result<GlyphBox> { unimplemented!() }
//! # }
//!
//! let measurer = TextMeasurer::new(Arc::new(HostSurface));
//! let ctx = FormattingContext::default().with_line_height(120.0);
//! let run = Run::default().with_bold(true);
//!
//! let metrics = measurer.measure("Hello, World!", Some(&run), &ctx)?;
//! println!("{}x{} ascent={}", metrics.width, metrics.height, metrics.ascent);
//! # Ok::<(), textrun_core::TextRunError>(())
//! ```
//!
//! ## The Seams
//!
//! - [`MeasurementSurface`] - the host primitive that boxes a string
//! - [`DrawSurface`] - the host canvas that paints it
//!
//! Everything between them (style fallback, cache keys, word-spacing and
//! line-height adjustments) lives here and is the same for every host.

pub mod cache;
pub mod context;
pub mod draw;
pub mod error;
pub mod measure;
pub mod measurer;
pub mod style;
pub mod traits;

pub use cache::{CacheStats, MeasureCache, MeasureKey};
pub use context::FormattingContext;
pub use draw::{draw, DrawBox};
pub use error::{Result, TextRunError};
pub use measurer::TextMeasurer;
pub use style::{apply_style, prepare_surface, resolve_font, resolve_style, ResolvedStyle};
pub use traits::{DrawSurface, MeasurementSurface, TextAlign, TextBaseline};
pub use types::{Run, Script, TextMetrics};

/// Non-breaking space, substituted for whitespace before measuring
pub const NBSP: char = '\u{00A0}';

/// What gets drawn in place of a bare line break
pub const ENTER: char = NBSP;

/// The data structures shared by the measurer and the drawing code
pub mod types {
    use serde::{Deserialize, Serialize};

    /// Vertical position of a run relative to the surrounding text
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Script {
        #[default]
        None,
        Super,
        Sub,
    }

    impl Script {
        /// Super- and subscripts render at a reduced size
        pub fn is_shifted(self) -> bool {
            matches!(self, Script::Super | Script::Sub)
        }

        /// Keyword used by `vertical-align`, if any
        pub fn vertical_align(self) -> Option<&'static str> {
            match self {
                Script::None => None,
                Script::Super => Some("super"),
                Script::Sub => Some("sub"),
            }
        }
    }

    /// Formatting attributes of a single run
    ///
    /// Every attribute is optional. Anything missing comes from the
    /// [`FormattingContext`](crate::FormattingContext) at resolution time.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Run {
        pub font: Option<String>,
        /// Size in points
        pub size: Option<f32>,
        pub bold: bool,
        pub italic: bool,
        pub underline: bool,
        pub strikeout: bool,
        pub color: Option<String>,
        pub script: Script,
    }

    impl Run {
        pub fn with_font(mut self, font: impl Into<String>) -> Self {
            self.font = Some(font.into());
            self
        }

        pub fn with_size(mut self, size: f32) -> Self {
            self.size = Some(size);
            self
        }

        pub fn with_bold(mut self, bold: bool) -> Self {
            self.bold = bold;
            self
        }

        pub fn with_italic(mut self, italic: bool) -> Self {
            self.italic = italic;
            self
        }

        pub fn with_underline(mut self, underline: bool) -> Self {
            self.underline = underline;
            self
        }

        pub fn with_strikeout(mut self, strikeout: bool) -> Self {
            self.strikeout = strikeout;
            self
        }

        pub fn with_color(mut self, color: impl Into<String>) -> Self {
            self.color = Some(color.into());
            self
        }

        pub fn with_script(mut self, script: Script) -> Self {
            self.script = script;
            self
        }
    }

    /// What the host primitive reports for a string
    ///
    /// Descent is not measured directly; it is `height - ascent`.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GlyphBox {
        pub ascent: f32,
        pub height: f32,
        pub width: f32,
    }

    /// Pixel metrics of measured text
    ///
    /// Four numbers and nothing else, so copying one out of the cache before
    /// adjusting it is a plain structural copy.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct TextMetrics {
        pub width: f32,
        pub height: f32,
        pub ascent: f32,
        pub descent: f32,
    }

    impl TextMetrics {
        /// Scale ascent and descent by a line-height percentage
        ///
        /// Each product is truncated toward zero and the height is rebuilt
        /// from the truncated parts, so `ascent + descent == height` holds.
        pub fn with_line_height(self, line_height: Option<f32>) -> Self {
            match line_height {
                Some(percent) => {
                    let ascent = (self.ascent * percent / 100.0).trunc();
                    let descent = (self.descent * percent / 100.0).trunc();
                    Self {
                        width: self.width,
                        height: ascent + descent,
                        ascent,
                        descent,
                    }
                },
                None => self,
            }
        }
    }
}
