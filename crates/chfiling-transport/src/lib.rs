//! Transport seam for GovTalk gateway exchanges.
//!
//! The filing core never talks to the network itself. It hands serialized
//! envelope bytes to a [`Transport`] and gets the raw response bytes back.
//! Timeouts and any retry policy belong to the transport, not the core.
//!
//! - [`Transport`] is implemented for closures, which is what tests use.
//! - [`HttpTransport`] posts to the gateway URL (behind the `http` feature).

pub mod error;
pub mod traits;

#[cfg(feature = "http")]
pub mod http;

pub use error::{Result, TransportError};
pub use traits::Transport;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTransport};
