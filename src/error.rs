//! Error taxonomy for the rasterization engine.
//!
//! Every condition here is local and recoverable: the caller reports the
//! failing operation and the scene keeps its last valid state.

use thiserror::Error;

/// Convenience alias used throughout the core modules.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by rasterizers, the fill engine, transforms and the shape codec.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported glyph '{0}' (supported: A, B, C)")]
    InvalidGlyph(String),

    #[error("polygon needs at least 3 vertices, got {count}")]
    InsufficientVertices { count: usize },

    #[error("malformed shape record #{index}: {reason}")]
    MalformedShape { index: usize, reason: String },

    #[error("unknown shape type '{0}'")]
    UnknownShapeType(String),

    #[error("unsupported transform: {0}")]
    UnsupportedTransform(String),

    #[error("invalid scene json: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        EngineError::MalformedShape {
            index,
            reason: reason.into(),
        }
    }
}
