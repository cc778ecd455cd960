/// Errors that can occur while loading or checking a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to load config: {0}")]
    LoadFailed(String),

    /// The config file exceeds the configured size cap.
    #[error("config file too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: usize },

    /// The config document is not valid JSON, or a value has the wrong shape.
    #[error("config is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The embedded schema could not be compiled.
    #[error("failed to compile config schema: {0}")]
    CompileFailed(String),

    /// The config document violates the schema (missing or mistyped keys).
    #[error("invalid config: {0}")]
    Invalid(String),

    /// A required field is present but empty.
    #[error("config field `{0}` must not be empty")]
    EmptyField(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
