//! Error types for the pack converter.

use thiserror::Error;

/// Result type alias using ConverterError.
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// Failed to read or write a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse or serialize JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found in either the input or the vanilla pack.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// Failed to flatten a model.
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// Model inheritance chain too deep (circular reference protection).
    #[error("Model inheritance too deep (possible circular reference): {0}")]
    ModelInheritanceTooDeep(String),

    /// No block state data is available, so no block can be resolved.
    #[error("Missing block state data: {0}")]
    MissingStateData(String),

    /// Failed to build a sprite sheet.
    #[error("Atlas building error: {0}")]
    AtlasBuild(String),

    /// Failed to write the converted pack.
    #[error("Export error: {0}")]
    Export(String),
}
