//! Configuration error types

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL or an endpoint path does not form a valid URL.
    #[error("Invalid URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },

    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    /// Creates a new invalid value error.
    pub fn invalid_value(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}
