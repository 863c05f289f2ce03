//! From run attributes to a concrete style
//!
//! Every attribute a run leaves out is taken from the formatting context.
//! Super- and subscripts shrink to 80% of the size they would otherwise
//! have. Nothing here can fail.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::{
    context::FormattingContext,
    traits::{DrawSurface, TextAlign, TextBaseline},
    types::{Run, Script},
};

/// Size multiplier for super- and subscript runs
pub const SCRIPT_SCALE: f32 = 0.8;

/// A run with every fallback applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    pub family: String,
    /// Effective size in points, script scaling included
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
    pub script: Script,
}

impl ResolvedStyle {
    pub fn resolve(run: Option<&Run>, ctx: &FormattingContext) -> Self {
        let Some(run) = run else {
            return Self {
                family: ctx.font.clone(),
                size: ctx.size,
                bold: false,
                italic: false,
                color: ctx.color.clone(),
                script: Script::None,
            };
        };

        let mut size = run.size.unwrap_or(ctx.size);
        if run.script.is_shifted() {
            size *= SCRIPT_SCALE;
        }

        Self {
            family: run.font.clone().unwrap_or_else(|| ctx.font.clone()),
            size,
            bold: run.bold,
            italic: run.italic,
            color: run.color.clone().unwrap_or_else(|| ctx.color.clone()),
            script: run.script,
        }
    }

    /// Canvas-style font descriptor, e.g. `"italic bold  12pt Georgia"`
    pub fn font_string(&self) -> String {
        let mut font = String::new();
        if self.italic {
            font.push_str("italic ");
        }
        if self.bold {
            font.push_str("bold ");
        }
        let _ = write!(font, " {}pt {}", self.size, self.family);
        font
    }

    /// Inline CSS for the run, e.g. `"font:  10pt Arial; color: black"`
    pub fn css(&self) -> String {
        let mut css = format!("font: {}; color: {}", self.font_string(), self.color);
        if let Some(align) = self.script.vertical_align() {
            let _ = write!(css, "; vertical-align: {align}");
        }
        css
    }
}

/// Font descriptor for a run
pub fn resolve_font(run: Option<&Run>, ctx: &FormattingContext) -> String {
    ResolvedStyle::resolve(run, ctx).font_string()
}

/// Inline CSS style for a run
pub fn resolve_style(run: Option<&Run>, ctx: &FormattingContext) -> String {
    ResolvedStyle::resolve(run, ctx).css()
}

/// Reset text anchoring to left/alphabetic
pub fn prepare_surface<S: DrawSurface + ?Sized>(surface: &mut S) {
    surface.set_text_align(TextAlign::Left);
    surface.set_text_baseline(TextBaseline::Alphabetic);
}

/// Configure a surface to draw `run`
///
/// Returns the resolved style so callers drawing right after do not
/// resolve twice.
pub fn apply_style<S: DrawSurface + ?Sized>(
    surface: &mut S,
    run: Option<&Run>,
    ctx: &FormattingContext,
) -> ResolvedStyle {
    let style = ResolvedStyle::resolve(run, ctx);
    prepare_surface(surface);
    surface.set_fill_color(&style.color);
    surface.set_font(&style);
    style
}
