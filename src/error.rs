//! Error types for the reflow engine

use thiserror::Error;

/// Result type alias for reflow operations
pub type Result<T> = std::result::Result<T, ReflowError>;

/// Errors raised inside the engine.
///
/// None of these are fatal to the host: public entry points log them and
/// report a declined outcome instead.
#[derive(Error, Debug)]
pub enum ReflowError {
    /// No page with this id exists in the template
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A subpage index no longer resolves (the tree changed underneath)
    #[error("Subpage {index} is out of range (page has {len} subpages)")]
    StaleSubPage { index: usize, len: usize },

    /// The live surface for a target is not mounted
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Template or config JSON could not be read
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error when reading templates or config files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
