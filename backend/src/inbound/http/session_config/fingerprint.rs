//! Short, non-secret fingerprint of the active session key.
//!
//! Logged at startup so operators can tell which key a deployment uses after
//! a rotation.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Hex-encode the first eight bytes of SHA-256 over the signing half of `key`.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use portal_backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}
