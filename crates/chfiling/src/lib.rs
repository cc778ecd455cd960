//! Companies House GovTalk filing client.
//!
//! Builds authenticated GovTalk envelopes, files accounts documents and
//! classifies gateway responses. Transaction IDs and submission numbers are
//! kept in a durable state file so a presenter never reuses either.
//!
//! # Crate Structure
//!
//! - [`transport`]: transport seam, blocking HTTP behind the `http` feature
//! - [`config`]: presenter config loading and schema validation
//! - [`state`]: durable transaction and submission counters
//! - [`envelope`]: envelope model, XML serialization and parsing
//! - [`client`]: request builders, response classifier, [`client::Session`]
//!
//! ```no_run
//! # #[cfg(feature = "http")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chfiling::client::{CommitPolicy, Response, Session};
//! use chfiling::state::State;
//! use chfiling::transport::HttpTransport;
//!
//! let config = chfiling::config::from_path("config.json".as_ref())?;
//! let transport = HttpTransport::new(config.url.clone())?;
//! let state = State::load("state.json")?;
//! let mut session = Session::new(config, state, transport).with_policy(CommitPolicy::AfterDelivery);
//!
//! if let Response::Status(entries) = session.submission_status(None)? {
//!     for entry in entries {
//!         println!("{entry}");
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "http"))]
//! # fn main() {}
//! ```

/// Re-export transport types.
pub mod transport {
    pub use chfiling_transport::*;
}

/// Re-export config types.
pub mod config {
    pub use chfiling_config::*;
}

/// Re-export state types.
pub mod state {
    pub use chfiling_state::*;
}

/// Re-export envelope types.
pub mod envelope {
    pub use chfiling_envelope::*;
}

/// Re-export session types.
pub mod client {
    pub use chfiling_client::*;
}
