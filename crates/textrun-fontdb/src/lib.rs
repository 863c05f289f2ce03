//! Fonts for the textrun backends
//!
//! Runs name a family and ask for bold or italic; backends need bytes they
//! can measure and draw. [`FontBook`] bridges the two: it keeps every
//! loaded face, indexed by family and [`FaceStyle`], and answers "what
//! should `Georgia` bold italic use" with the closest face it has.
//!
//! ## Memory Management
//!
//! Faces store their raw data and create a skrifa `FontRef` on demand for
//! parsing. TTC collections are supported through a face index.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::attribute::Style;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::string::StringId;
use skrifa::{GlyphId, MetadataProvider};

use textrun_core::{
    error::{FontLoadError, RenderError, Result},
    ResolvedStyle, TextRunError,
};

/// Weight at and above which a face counts as bold
const BOLD_WEIGHT: f32 = 600.0;

/// The two style bits a run can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FaceStyle {
    pub const REGULAR: Self = Self {
        bold: false,
        italic: false,
    };

    pub fn of(style: &ResolvedStyle) -> Self {
        Self {
            bold: style.bold,
            italic: style.italic,
        }
    }

    /// How many bits differ, used to rank fallbacks
    fn distance(self, other: Self) -> u8 {
        u8::from(self.bold != other.bold) + u8::from(self.italic != other.italic)
    }
}

/// Ascent, descent and leading at a pixel size
///
/// Descent is positive below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

/// One face that has been brought into memory
pub struct FontFace {
    data: Vec<u8>,
    face_index: u32,
    family: String,
    style: FaceStyle,
    units_per_em: u16,
}

impl FontFace {
    /// Parse a face, taking family and style from its own tables
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let (family, style) = {
            let font = skrifa::FontRef::from_index(&data, face_index)
                .map_err(|_| FontLoadError::InvalidData)?;
            let family = font
                .localized_strings(StringId::TYPOGRAPHIC_FAMILY_NAME)
                .english_or_first()
                .or_else(|| font.localized_strings(StringId::FAMILY_NAME).english_or_first())
                .map(|name| name.to_string())
                .ok_or(FontLoadError::InvalidData)?;
            let attributes = font.attributes();
            let style = FaceStyle {
                bold: attributes.weight.value() >= BOLD_WEIGHT,
                italic: !matches!(attributes.style, Style::Normal),
            };
            (family, style)
        };
        Self::with_family(data, face_index, family, style)
    }

    /// Parse a face but file it under a family and style of our choosing
    pub fn with_family(
        data: Vec<u8>,
        face_index: u32,
        family: impl Into<String>,
        style: FaceStyle,
    ) -> Result<Self> {
        // Validate the font data by attempting to parse it
        let font_ref =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);

        Ok(Self {
            data,
            face_index,
            family: family.into(),
            style,
            units_per_em,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn style(&self) -> FaceStyle {
        self.style
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn font_ref(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        self.font_ref()?.charmap().map(ch).map(|gid| gid.to_u32())
    }

    /// Advance widths at `px` pixels per em, one per character
    ///
    /// A character without a glyph advances like `.notdef`.
    pub fn advances(&self, text: &str, px: f32) -> Vec<f32> {
        let Some(font) = self.font_ref() else {
            return vec![0.0; text.chars().count()];
        };
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(Size::new(px), LocationRef::default());
        text.chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                metrics.advance_width(gid).unwrap_or(0.0)
            })
            .collect()
    }

    /// Total advance of `text` at `px` pixels per em
    pub fn advance_width(&self, text: &str, px: f32) -> f32 {
        self.advances(text, px).iter().sum()
    }

    pub fn vertical_metrics(&self, px: f32) -> VerticalMetrics {
        let Some(font) = self.font_ref() else {
            return VerticalMetrics::default();
        };
        let metrics = font.metrics(Size::new(px), LocationRef::default());
        VerticalMetrics {
            ascent: metrics.ascent,
            descent: -metrics.descent,
            leading: metrics.leading,
        }
    }

    /// Trace a glyph outline at `px` pixels per em, y pointing up
    pub fn draw_glyph(&self, glyph_id: u32, px: f32, pen: &mut impl OutlinePen) -> Result<()> {
        let font = self.font_ref().ok_or(FontLoadError::InvalidData)?;
        let outlines = font.outline_glyphs();
        let glyph = outlines
            .get(GlyphId::new(glyph_id))
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;
        let settings = DrawSettings::unhinted(Size::new(px), LocationRef::default());
        glyph
            .draw(settings, pen)
            .map_err(|_| RenderError::PathBuildingFailed)?;
        Ok(())
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("style", &self.style)
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Every face we know about, by family
#[derive(Default)]
pub struct FontBook {
    faces: Vec<Arc<FontFace>>,
    /// Lowercased family name to indices into `faces`
    families: HashMap<String, Vec<usize>>,
    /// Prevents loading the same font file twice
    path_cache: HashMap<PathBuf, Arc<FontFace>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a font file, reading family and style from the font itself
    ///
    /// Loading the same path twice returns the face loaded the first time.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<FontFace>> {
        let path = path.as_ref();
        let cache_key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if let Some(face) = self.path_cache.get(&cache_key) {
            return Ok(face.clone());
        }

        let data = fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                TextRunError::from(FontLoadError::FileNotFound(path.display().to_string()))
            },
            _ => TextRunError::Io(err),
        })?;
        let face = self.insert(FontFace::from_data_index(data, 0)?);
        self.path_cache.insert(cache_key, face.clone());
        Ok(face)
    }

    /// Add a face from memory, reading family and style from the font
    pub fn load_data(&mut self, data: Vec<u8>) -> Result<Arc<FontFace>> {
        Ok(self.insert(FontFace::from_data_index(data, 0)?))
    }

    /// Add a face from memory under an explicit family and style
    ///
    /// Useful for aliases such as serving `Arial` from a metric-compatible
    /// substitute.
    pub fn register(
        &mut self,
        family: &str,
        style: FaceStyle,
        data: Vec<u8>,
    ) -> Result<Arc<FontFace>> {
        Ok(self.insert(FontFace::with_family(data, 0, family, style)?))
    }

    fn insert(&mut self, face: FontFace) -> Arc<FontFace> {
        let face = Arc::new(face);
        log::debug!(
            "font book: registered {} (bold={}, italic={})",
            face.family(),
            face.style().bold,
            face.style().italic
        );
        self.families
            .entry(face.family().to_lowercase())
            .or_default()
            .push(self.faces.len());
        self.faces.push(face.clone());
        face
    }

    /// Closest face for a family and style
    ///
    /// Same family with the nearest style first; otherwise the first face
    /// ever registered.
    pub fn resolve(&self, family: &str, style: FaceStyle) -> Option<Arc<FontFace>> {
        if let Some(indices) = self.families.get(&family.to_lowercase()) {
            let best = indices
                .iter()
                .map(|&i| &self.faces[i])
                .min_by_key(|face| face.style().distance(style));
            if let Some(face) = best {
                if face.style() != style {
                    log::debug!(
                        "font book: {family} has no exact {style:?}, using {:?}",
                        face.style()
                    );
                }
                return Some(face.clone());
            }
        }

        let fallback = self.faces.first().cloned();
        if let Some(face) = &fallback {
            log::debug!("font book: {family} not found, falling back to {}", face.family());
        }
        fallback
    }

    /// Closest face for a resolved run style
    pub fn resolve_style(&self, style: &ResolvedStyle) -> Option<Arc<FontFace>> {
        self.resolve(&style.family, FaceStyle::of(style))
    }

    /// Registered family names, as first written
    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .families
            .values()
            .filter_map(|indices| indices.first().map(|&i| self.faces[i].family()))
            .collect();
        names.sort_unstable();
        names
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Forget every face
    pub fn clear(&mut self) {
        self.faces.clear();
        self.families.clear();
        self.path_cache.clear();
    }
}
