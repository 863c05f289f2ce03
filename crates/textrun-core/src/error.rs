//! Error types for textrun

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextRunError>;

/// Main error type for textrun
///
/// Style resolution never fails; only the host seams do.
#[derive(Debug, Error)]
pub enum TextRunError {
    #[error("Measurement unavailable: {0}")]
    MeasurementUnavailable(String),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font family not found: {0}")]
    FamilyNotFound(String),
}

/// Drawing errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Glyph not found: {0}")]
    GlyphNotFound(u32),

    #[error("Path building failed")]
    PathBuildingFailed,

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
