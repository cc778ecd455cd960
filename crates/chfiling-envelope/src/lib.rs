//! GovTalk envelope codec.
//!
//! Every message exchanged with the filing gateway is wrapped in a GovTalk
//! envelope:
//! - `EnvelopeVersion` fixed at 2.0 for outgoing requests
//! - `Header` with message class, qualifier, transaction ID and digested sender credentials
//! - `GovTalkDetails` carrying routing and header-level errors
//! - `Body` holding exactly one class-specific content element
//!
//! Serialization emits elements in schema order with the namespaces the
//! gateway validates against. Parsing is namespace-tolerant and rejects
//! documents missing any mandated element.

pub mod auth;
pub mod body;
pub mod class;
pub mod codec;
pub mod envelope;
pub mod error;
mod reader;
mod writer;

pub use auth::{one_way_hash, AUTH_METHOD};
pub use body::{
    AccountsImageResult, Address, Body, CompanyData, CompanyDataRequest, Document, FormHeader,
    FormSubmission, GovTalkError, SubmissionAcknowledgement, SubmissionStatusEntry,
    SubmissionStatusRequest,
};
pub use class::{MessageClass, Qualifier};
pub use codec::{parse, serialize, ENVELOPE_NS, ENVELOPE_VERSION};
pub use envelope::{
    ChannelRouting, Envelope, GovTalkDetails, Header, IdAuthentication, Key, MessageDetails,
    SenderDetails, PRODUCT_NAME,
};
pub use error::{EnvelopeError, Result};
