use std::path::PathBuf;

/// Errors that can occur while loading or persisting session state.
///
/// Every variant is fatal for the session: without a durable counter the
/// next transaction ID cannot be trusted.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Reading the state file failed.
    #[error("failed to read state {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing or replacing the state file failed.
    #[error("failed to persist state {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The state file exists but does not hold valid counters.
    #[error("state {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A counter would overflow.
    #[error("{0} counter exhausted")]
    Exhausted(&'static str),
}

pub type Result<T> = std::result::Result<T, StateError>;
