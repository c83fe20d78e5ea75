//! Error types for Scenecast.

use thiserror::Error;

/// Main error type for Scenecast operations.
///
/// The compiler only fails for structural corruption of its inputs or
/// outputs. Data-driven problems with a safe fallback (a missing voice clip,
/// an unknown speaker, a missing BGM duration) are surfaced as
/// [`crate::CompileWarning`]s instead.
#[derive(Error, Debug)]
pub enum ScenecastError {
    #[error("invalid script: {0}")]
    InvalidScript(String),

    #[error("invalid timeline emission: {0}")]
    InvalidTimeline(String),

    #[error("unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Scenecast operations.
pub type Result<T> = std::result::Result<T, ScenecastError>;
