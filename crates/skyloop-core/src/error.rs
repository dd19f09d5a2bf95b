use thiserror::Error;

/// Errors raised while loading flight configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse flight config RON: {0}")]
    ParseError(String),
}
