//! JSON Surface - When you need to see what the drawing code really did
//!
//! Pixels hide mistakes: a baseline off by two looks fine until it
//! doesn't. This surface draws nothing and remembers every call instead,
//! so the exact sequence can be asserted on, diffed, or replayed onto a
//! real canvas later.

use serde::{Deserialize, Serialize};
use textrun_core::{
    error::Result, DrawSurface, ResolvedStyle, TextAlign, TextBaseline, TextRunError,
};

/// Schema version for JSON output format
pub const JSON_SCHEMA_VERSION: &str = "1.0";

/// One recorded surface call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillColor {
        color: String,
    },
    Font {
        /// Descriptor as a canvas would receive it
        font: String,
        style: ResolvedStyle,
    },
    TextAlign {
        align: TextAlign,
    },
    TextBaseline {
        baseline: TextBaseline,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Complete recording in a debug-friendly format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Schema version for forward compatibility
    pub schema_version: String,
    pub ops: Vec<DrawOp>,
}

/// A surface that records instead of painting
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Hand back the recording and start over
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Replay the recording onto another surface
    pub fn replay<S: DrawSurface + ?Sized>(&self, target: &mut S) -> Result<()> {
        replay(&self.ops, target)
    }

    pub fn to_json(&self) -> Result<String> {
        let output = JsonOutput {
            schema_version: JSON_SCHEMA_VERSION.to_string(),
            ops: self.ops.clone(),
        };
        serde_json::to_string_pretty(&output)
            .map_err(|e| TextRunError::Encoding(format!("JSON serialization failed: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let output: JsonOutput = serde_json::from_str(json)
            .map_err(|e| TextRunError::Encoding(format!("JSON parsing failed: {e}")))?;
        if output.schema_version != JSON_SCHEMA_VERSION {
            log::warn!(
                "recording schema {} differs from {}",
                output.schema_version,
                JSON_SCHEMA_VERSION
            );
        }
        Ok(Self { ops: output.ops })
    }
}

/// Apply recorded ops to `target` in order
pub fn replay<S: DrawSurface + ?Sized>(ops: &[DrawOp], target: &mut S) -> Result<()> {
    for op in ops {
        match op {
            DrawOp::FillColor { color } => target.set_fill_color(color),
            DrawOp::Font { style, .. } => target.set_font(style),
            DrawOp::TextAlign { align } => target.set_text_align(*align),
            DrawOp::TextBaseline { baseline } => target.set_text_baseline(*baseline),
            DrawOp::FillText { text, x, y } => target.fill_text(text, *x, *y)?,
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
            } => target.fill_rect(*x, *y, *width, *height)?,
        }
    }
    Ok(())
}

impl DrawSurface for RecordingSurface {
    fn set_fill_color(&mut self, color: &str) {
        self.ops.push(DrawOp::FillColor {
            color: color.to_string(),
        });
    }

    fn set_font(&mut self, style: &ResolvedStyle) {
        self.ops.push(DrawOp::Font {
            font: style.font_string(),
            style: style.clone(),
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(DrawOp::TextAlign { align });
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(DrawOp::TextBaseline { baseline });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }
}
