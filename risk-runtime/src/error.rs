use thiserror::Error;

/// Errors raised at the request boundary.
///
/// The similarity and slippage computations themselves are total and never
/// return this type; it only covers decoding requests, builders and config.
/// File and stdin reads live in the binary and report through `anyhow`.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RiskError {
    fn from(e: serde_json::Error) -> Self {
        RiskError::SerializationError(e.to_string())
    }
}
