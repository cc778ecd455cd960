//! Message classes and qualifiers.
//!
//! The class names the operation a message belongs to; the qualifier says
//! where in the exchange the message sits.

use std::fmt;

use crate::error::{EnvelopeError, Result};

/// GovTalk message class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageClass {
    /// Company details query (`CompanyDataRequest`).
    CompanyData,
    /// Accounts filing (`Accounts`).
    Accounts,
    /// Status of earlier filings (`GetSubmissionStatus`).
    SubmissionStatus,
    /// Rendered image of submitted accounts (`AccountsImage`).
    AccountsImage,
    /// Any other class, including form identifiers set in config.
    Other(String),
}

impl MessageClass {
    /// Wire name of the class.
    pub fn as_str(&self) -> &str {
        match self {
            Self::CompanyData => "CompanyDataRequest",
            Self::Accounts => "Accounts",
            Self::SubmissionStatus => "GetSubmissionStatus",
            Self::AccountsImage => "AccountsImage",
            Self::Other(name) => name,
        }
    }

    /// Map a wire name to a class. Unknown names are kept verbatim.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "CompanyDataRequest" => Self::CompanyData,
            "Accounts" => Self::Accounts,
            "GetSubmissionStatus" => Self::SubmissionStatus,
            "AccountsImage" => Self::AccountsImage,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GovTalk message qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Request,
    Acknowledgement,
    /// The request result.
    Response,
    Poll,
    Error,
}

impl Qualifier {
    /// Wire name of the qualifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Acknowledgement => "acknowledgement",
            Self::Response => "response",
            Self::Poll => "poll",
            Self::Error => "error",
        }
    }

    /// Parse a wire qualifier.
    pub fn from_wire(name: &str) -> Result<Self> {
        match name {
            "request" => Ok(Self::Request),
            "acknowledgement" => Ok(Self::Acknowledgement),
            "response" => Ok(Self::Response),
            "poll" => Ok(Self::Poll),
            "error" => Ok(Self::Error),
            other => Err(EnvelopeError::malformed(format!(
                "unknown qualifier {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
