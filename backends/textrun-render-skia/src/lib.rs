//! Skia Surface - styled runs painted into a tiny-skia pixmap
//!
//! A canvas-shaped [`DrawSurface`]: set a fill color and a font, then fill
//! text and rectangles. Glyph outlines come from skrifa, pass through a
//! kurbo path so they can be culled against the canvas, and are filled by
//! tiny-skia with anti-aliasing.

pub mod color;

use std::sync::Arc;

use kurbo::{BezPath, PathEl, Shape};
use textrun_core::{
    error::{FontLoadError, RenderError, Result},
    DrawSurface, FormattingContext, ResolvedStyle, TextAlign, TextBaseline,
};
use textrun_fontdb::{FontBook, FontFace};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

pub use color::parse_color;

/// CSS reference pixel density
pub const DEFAULT_DPI: f32 = 96.0;

/// A pixmap with canvas-style drawing state
pub struct SkiaSurface {
    pixmap: Pixmap,
    fonts: Arc<FontBook>,
    dpi: f32,
    fill: Color,
    style: ResolvedStyle,
    align: TextAlign,
    baseline: TextBaseline,
}

impl SkiaSurface {
    /// A transparent canvas of `width` x `height` pixels
    pub fn new(width: u32, height: u32, fonts: Arc<FontBook>) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        Ok(Self {
            pixmap,
            fonts,
            dpi: DEFAULT_DPI,
            fill: Color::BLACK,
            style: ResolvedStyle::resolve(None, &FormattingContext::default()),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
        })
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Fill the whole canvas, ignoring the current fill color
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.fill);
        paint.anti_alias = true;
        paint
    }

    fn face(&self) -> Result<Arc<FontFace>> {
        self.fonts
            .resolve_style(&self.style)
            .ok_or_else(|| FontLoadError::FamilyNotFound(self.style.family.clone()).into())
    }

    /// Horizontal shift for the current alignment
    fn align_offset(&self, advance: f32) -> f32 {
        match self.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -advance / 2.0,
            TextAlign::Right => -advance,
        }
    }

    /// Vertical shift from the anchor to the alphabetic baseline
    fn baseline_offset(&self, ascent: f32, descent: f32) -> f32 {
        match self.baseline {
            TextBaseline::Alphabetic => 0.0,
            TextBaseline::Top => ascent,
            TextBaseline::Middle => (ascent - descent) / 2.0,
            TextBaseline::Bottom => -descent,
        }
    }

    fn fill_glyph(
        &mut self,
        face: &FontFace,
        glyph_id: u32,
        px: f32,
        x: f32,
        y: f32,
    ) -> Result<()> {
        let mut path = BezPath::new();
        face.draw_glyph(glyph_id, px, &mut PathPen { path: &mut path })?;

        // Font outlines are y-up; flip into the canvas at the pen position
        let transform = Transform::from_row(1.0, 0.0, 0.0, -1.0, x, y);

        let bbox = path.bounding_box();
        let (width, height) = (self.pixmap.width() as f64, self.pixmap.height() as f64);
        let (x, y) = (x as f64, y as f64);
        if bbox.x1 + x < 0.0 || bbox.x0 + x > width || y - bbox.y0 < 0.0 || y - bbox.y1 > height {
            log::trace!("skia: glyph {glyph_id} outside canvas, skipped");
            return Ok(());
        }

        let Some(skia_path) = to_skia_path(&path) else {
            // Empty outline, e.g. a space
            return Ok(());
        };
        let paint = self.paint();
        self.pixmap
            .fill_path(&skia_path, &paint, FillRule::Winding, transform, None);
        Ok(())
    }
}

impl DrawSurface for SkiaSurface {
    fn set_fill_color(&mut self, color: &str) {
        // Like a canvas context, an unparsable color leaves the old one
        match parse_color(color) {
            Ok(parsed) => self.fill = parsed,
            Err(err) => log::warn!("skia: {err}, keeping previous fill"),
        }
    }

    fn set_font(&mut self, style: &ResolvedStyle) {
        self.style = style.clone();
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        let face = self.face()?;
        let px = self.style.size * self.dpi / 72.0;
        let advances = face.advances(text, px);
        let total: f32 = advances.iter().sum();
        let metrics = face.vertical_metrics(px);

        let mut pen_x = x + self.align_offset(total);
        let pen_y = y + self.baseline_offset(metrics.ascent, metrics.descent);

        log::debug!(
            "skia: fill_text {:?} at ({}, {}) with {} {}px",
            text,
            pen_x,
            pen_y,
            face.family(),
            px
        );

        for (ch, advance) in text.chars().zip(advances) {
            if !ch.is_whitespace() {
                if let Some(glyph_id) = face.glyph_id(ch) {
                    self.fill_glyph(&face, glyph_id, px, pen_x, pen_y)?;
                }
            }
            pen_x += advance;
        }
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        // Zero or negative extents draw nothing, as on a canvas
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return Ok(());
        };
        let paint = self.paint();
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }
}

/// Collects a glyph outline into a kurbo path
struct PathPen<'a> {
    path: &'a mut BezPath,
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Translate kurbo's path format into tiny-skia's
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}
