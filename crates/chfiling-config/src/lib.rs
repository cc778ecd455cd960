//! Presenter configuration for GovTalk filing sessions.
//!
//! The config resource is a JSON object. Before it is deserialized it is
//! checked against an embedded JSON Schema, so a missing or mistyped key is
//! reported as a [`ConfigError`] before any envelope is built or any state is
//! touched.

pub mod config;
pub mod error;
pub mod load;
pub mod options;
pub mod schema;

pub use config::{Config, DEFAULT_ACCOUNTS_CLASS};
pub use error::{ConfigError, Result};
pub use load::{from_path, from_path_with_options, from_str, from_str_with_options};
pub use options::LoadOptions;
pub use schema::{ConfigValidator, CONFIG_SCHEMA};
