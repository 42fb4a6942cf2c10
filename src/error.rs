use thiserror::Error;

/// Main error type for the training orchestrator
#[derive(Error, Debug)]
pub enum TdmpcError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Startup preconditions
    #[error("Compute device unavailable: {device}")]
    DeviceUnavailable { device: String },

    // Rollout invariants
    #[error("Episode length mismatch: expected {expected}, got {actual}")]
    EpisodeLengthMismatch { expected: usize, actual: usize },

    #[error("Episode already terminated, no further transitions accepted")]
    EpisodeClosed,

    // Collaborator failures
    #[error("Agent update did not report metric: {0}")]
    MissingMetric(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Agent error: {0}")]
    Agent(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for TdmpcError
pub type Result<T> = std::result::Result<T, TdmpcError>;

impl TdmpcError {
    /// Whether the error is a broken invariant rather than a failing collaborator
    pub fn is_invariant_breach(&self) -> bool {
        matches!(
            self,
            TdmpcError::EpisodeLengthMismatch { .. } | TdmpcError::EpisodeClosed
        )
    }
}
