//! Default formatting, passed explicitly
//!
//! Runs only say what differs from the document defaults. The defaults
//! themselves travel with every call as a [`FormattingContext`], so two
//! measurements can never disagree about which defaults were in force.
//!
//! # Environment
//!
//! [`FormattingContext::from_env`] layers these variables over the defaults:
//!
//! | Variable               | Field          |
//! |------------------------|----------------|
//! | `TEXTRUN_FONT`         | `font`         |
//! | `TEXTRUN_SIZE`         | `size`         |
//! | `TEXTRUN_COLOR`        | `color`        |
//! | `TEXTRUN_LINE_HEIGHT`  | `line_height`  |
//! | `TEXTRUN_WORD_SPACING` | `word_spacing` |
//! | `TEXTRUN_CACHE`        | `use_cache`    |
//!
//! ```bash
//! TEXTRUN_LINE_HEIGHT=150 TEXTRUN_CACHE=0 ./my_app
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextRunError};

/// Fallback formatting for runs, plus the measurement switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingContext {
    pub font: String,
    /// Size in points
    pub size: f32,
    pub color: String,
    /// Line height as a percentage of the measured ascent and descent
    pub line_height: Option<f32>,
    /// Word spacing as a percentage of the reference glyph width
    pub word_spacing: Option<f32>,
    /// When false every measurement goes to the host
    pub use_cache: bool,
}

impl Default for FormattingContext {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            size: 10.0,
            color: "black".to_string(),
            line_height: None,
            word_spacing: None,
            use_cache: true,
        }
    }
}

impl FormattingContext {
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_line_height(mut self, percent: f32) -> Self {
        self.line_height = Some(percent);
        self
    }

    pub fn with_word_spacing(mut self, percent: f32) -> Self {
        self.word_spacing = Some(percent);
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Defaults overridden by `TEXTRUN_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ctx = Self::default();

        if let Some(font) = lookup("TEXTRUN_FONT") {
            ctx.font = font;
        }
        if let Some(color) = lookup("TEXTRUN_COLOR") {
            ctx.color = color;
        }
        if let Some(raw) = lookup("TEXTRUN_SIZE") {
            ctx.size = parse_number("TEXTRUN_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("TEXTRUN_LINE_HEIGHT") {
            ctx.line_height = Some(parse_number("TEXTRUN_LINE_HEIGHT", &raw)?);
        }
        if let Some(raw) = lookup("TEXTRUN_WORD_SPACING") {
            ctx.word_spacing = Some(parse_number("TEXTRUN_WORD_SPACING", &raw)?);
        }
        if let Some(raw) = lookup("TEXTRUN_CACHE") {
            ctx.use_cache = matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
            log::info!(
                "Textrun measurement cache {} via TEXTRUN_CACHE",
                if ctx.use_cache { "enabled" } else { "disabled" }
            );
        }

        Ok(ctx)
    }
}

fn parse_number(name: &str, raw: &str) -> Result<f32> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| TextRunError::Config(format!("{name} must be a number, got {raw:?}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(TextRunError::Config(format!(
            "{name} must be a non-negative number, got {raw:?}"
        )));
    }
    Ok(value)
}
