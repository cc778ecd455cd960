//! GovTalk filing session.
//!
//! Ties the pieces together: request builders produce bodies, the envelope
//! codec wraps and serializes them, a [`Transport`](chfiling_transport::Transport)
//! carries the bytes and the classifier turns the reply into a [`Response`]
//! or a [`ClientError`]. [`Session`] runs that pipeline and decides when the
//! transaction counter is committed.

pub mod classify;
pub mod error;
pub mod request;
pub mod session;

pub use classify::{
    classify, classify_code, Acceptance, ClassifiedError, ErrorCategory, ErrorEntry, Response,
    Rule, Status, StatusEntry, CLASSIFICATION,
};
pub use error::{ClientError, Result};
pub use request::Request;
pub use session::{CommitPolicy, Session};
