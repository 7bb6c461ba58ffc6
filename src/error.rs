use thiserror::Error;

/// Errors raised while loading artifacts or ranking verses
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact parsed but its contents are inconsistent
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corpus contains no verses")]
    EmptyCorpus,
}

pub type Result<T> = std::result::Result<T, FinderError>;
