//! Error types for scene construction and rendering.

use thiserror::Error;

/// A primitive violated its construction contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Degenerate triangle: vertices are collinear or coincident")]
    DegenerateTriangle,

    #[error("Non-finite {0} in primitive definition")]
    NonFinite(&'static str),
}

/// Errors surfaced by the rendering front end.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} frame")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
