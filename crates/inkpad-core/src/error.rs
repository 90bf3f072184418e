//! Errors for the boundary operations that can fail.
//!
//! Gesture handling and history replay never fail; they fall back to no-ops.

use thiserror::Error;

/// Errors raised while exporting, configuring or capturing a canvas.
#[derive(Debug, Error)]
pub enum InkpadError {
    #[error("Snapshot serialization error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Capture failed: {0}")]
    Capture(String),
}

/// Result type for fallible canvas operations.
pub type InkpadResult<T> = Result<T, InkpadError>;
