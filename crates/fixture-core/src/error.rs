//! Error types for configuration loading

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while reading or validating fixture configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is well-formed but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
