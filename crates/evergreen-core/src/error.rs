//! Error types for Evergreen

use thiserror::Error;

/// The main error type for Evergreen operations
#[derive(Debug, Error)]
pub enum EvergreenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown {kind} '{value}': expected one of {allowed:?}")]
    UnknownKey {
        kind: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

impl EvergreenError {
    /// Shorthand for a value that must be strictly positive and finite
    pub fn not_positive(field: impl Into<String>, value: f64) -> Self {
        EvergreenError::InvalidValue {
            field: field.into(),
            value,
            reason: "must be a positive finite number",
        }
    }
}

/// Result type alias for Evergreen operations
pub type Result<T> = std::result::Result<T, EvergreenError>;

impl From<toml::de::Error> for EvergreenError {
    fn from(err: toml::de::Error) -> Self {
        EvergreenError::TomlParseError(err.to_string())
    }
}
