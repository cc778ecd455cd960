//! Sender authentication digest.
//!
//! The gateway's "clear" authentication method expects the presenter ID and
//! the authentication value as lowercase hex MD5 digests. MD5 is mandated by
//! the protocol; this module is the only place that names it.

use md5::{Digest, Md5};

/// Authentication method sent alongside the digest.
pub const AUTH_METHOD: &str = "clear";

/// Digest a credential the way the gateway expects it.
pub fn one_way_hash(secret: &str) -> String {
    hex::encode(Md5::digest(secret.as_bytes()))
}
