use chfiling_config::ConfigError;

/// Errors that can occur while building, serializing or parsing envelopes.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// A field required to build the envelope is missing or empty.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The document is not well-formed XML or lacks a mandated element.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// The XML writer failed.
    #[error("failed to serialize envelope: {0}")]
    Serialize(String),
}

impl EnvelopeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
