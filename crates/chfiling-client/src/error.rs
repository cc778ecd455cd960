use chfiling_config::ConfigError;
use chfiling_envelope::EnvelopeError;
use chfiling_state::StateError;
use chfiling_transport::TransportError;

use crate::classify::{ClassifiedError, ErrorCategory};

/// Errors that can occur in a filing session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Config is missing a required value. Nothing was sent.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The request was rejected as invalid, locally or by the gateway.
    #[error("validation failed: {0}")]
    Validation(ClassifiedError),

    /// The response is not a usable GovTalk envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The gateway rejected the presenter credentials.
    #[error("authentication rejected: {0}")]
    Authentication(ClassifiedError),

    /// The gateway rejected the filing on business grounds.
    #[error("business rejection: {0}")]
    Business(ClassifiedError),

    /// The gateway reported an error code outside every known range.
    #[error("unclassified gateway error: {0}")]
    Unclassified(ClassifiedError),

    /// Loading or persisting the counters failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Transport-level error, propagated unchanged.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ClientError {
    /// Local validation failure; raised before any state is touched.
    pub fn invalid(text: impl Into<String>) -> Self {
        Self::Validation(ClassifiedError::local(ErrorCategory::Validation, text))
    }

    /// Classified gateway entries, if this error carries any.
    pub fn classified(&self) -> Option<&ClassifiedError> {
        match self {
            Self::Validation(err)
            | Self::Authentication(err)
            | Self::Business(err)
            | Self::Unclassified(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClassifiedError> for ClientError {
    fn from(err: ClassifiedError) -> Self {
        match err.category {
            ErrorCategory::Authentication => Self::Authentication(err),
            ErrorCategory::Validation => Self::Validation(err),
            ErrorCategory::Business => Self::Business(err),
            ErrorCategory::Unclassified => Self::Unclassified(err),
        }
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Config(err) => Self::Config(err),
            EnvelopeError::Malformed(message) => Self::MalformedResponse(message),
            EnvelopeError::Serialize(message) => {
                Self::invalid(format!("request cannot be encoded: {message}"))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
