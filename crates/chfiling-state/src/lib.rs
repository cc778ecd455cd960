//! Durable protocol counters for a presenter identity.
//!
//! The gateway rejects a transaction ID it has already seen, so the counter
//! must survive crashes and must never go backwards. [`State`] owns the
//! counters for one session and persists them with write-then-rename, so a
//! crash mid-write leaves either the previous or the new file on disk.
//!
//! Nothing here locks the state file. Two sessions sharing one file must be
//! serialized by the caller.

pub mod error;
pub mod store;
pub mod submission;

pub use error::{Result, StateError};
pub use store::{Counters, State, INITIAL_TRANSACTION_ID};
pub use submission::{
    format_submission_number, is_submission_number, MAX_SUBMISSION_COUNTER, SUBMISSION_DIGITS,
    SUBMISSION_PREFIX,
};
