//! Painting a run onto a surface
//!
//! The caller has already laid the run out and knows its box; drawing
//! only shifts the baseline for scripts and adds decorations.

use crate::{
    context::FormattingContext,
    error::Result,
    style::apply_style,
    traits::DrawSurface,
    types::{Run, Script},
    ENTER,
};

/// Where a laid-out run sits
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawBox {
    pub left: f32,
    pub baseline: f32,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl DrawBox {
    /// Baseline after raising superscripts by a third of the ascent and
    /// lowering subscripts by half the descent
    pub fn script_baseline(&self, script: Script) -> f32 {
        match script {
            Script::Super => self.baseline - self.ascent / 3.0,
            Script::Sub => self.baseline + self.descent / 2.0,
            Script::None => self.baseline,
        }
    }
}

/// Draw `text` styled as `run` inside `placement`
///
/// Decorations are one pixel tall and span the full box width: underline
/// one pixel below the (shifted) baseline, strikeout half an ascent above
/// that.
pub fn draw<S: DrawSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    run: &Run,
    ctx: &FormattingContext,
    placement: DrawBox,
) -> Result<()> {
    apply_style(surface, Some(run), ctx);
    let baseline = placement.script_baseline(run.script);

    if text == "\n" {
        let mut enter = [0u8; 4];
        surface.fill_text(ENTER.encode_utf8(&mut enter), placement.left, baseline)?;
    } else {
        surface.fill_text(text, placement.left, baseline)?;
    }

    if run.underline {
        surface.fill_rect(placement.left, baseline + 1.0, placement.width, 1.0)?;
    }
    if run.strikeout {
        surface.fill_rect(
            placement.left,
            baseline + 1.0 - placement.ascent / 2.0,
            placement.width,
            1.0,
        )?;
    }

    Ok(())
}
