//! Envelope format v1.
//!
//! V1 Wire Format:
//! ```text
//! "$ZK$" base64( SALT (16) | NONCE (12) | CIPHERTEXT (N) | TAG (16) )
//! ```
//!
//! base64 is the standard alphabet with padding.

use base64::{Engine, engine::general_purpose::STANDARD};

use super::Envelope;
use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, ZkError};

/// Prefix identifying a v1 envelope.
pub const PREFIX: &str = "$ZK$";

/// Smallest valid decoded payload: an empty plaintext.
pub const MIN_PAYLOAD_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Builds the v1 wire string.
pub fn encode(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> String {
    let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
    payload.extend_from_slice(salt);
    payload.extend_from_slice(nonce);
    payload.extend_from_slice(sealed);

    let mut out = String::with_capacity(PREFIX.len() + payload.len().div_ceil(3) * 4);
    out.push_str(PREFIX);
    STANDARD.encode_string(&payload, &mut out);
    out
}

/// Parses the base64 body of a v1 envelope (everything after the prefix).
pub fn decode(body: &str) -> Result<Envelope> {
    let payload = STANDARD.decode(body).map_err(|_| ZkError::Format)?;

    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(ZkError::Format);
    }

    let (salt, rest) = payload.split_at(SALT_LEN);
    let (nonce, sealed) = rest.split_at(NONCE_LEN);

    let salt: [u8; SALT_LEN] = salt.try_into().map_err(|_| ZkError::Format)?;
    let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| ZkError::Format)?;

    Ok(Envelope::new(salt, nonce, sealed.to_vec()))
}
