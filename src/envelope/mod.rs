//! Wire format for ZK envelopes.
//!
//! The prefix doubles as the version tag, so parsing dispatches on it the same
//! way a binary format would dispatch on a version byte.

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::{Result, ZkError};

pub mod v1;

/// Envelope versions this build understands, identified by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeVersion {
    /// `$ZK$`: Argon2id(64 MiB, t=1, p=4) + AES-256-GCM.
    V1,
}

/// Version used for new envelopes.
pub const CURRENT_VERSION: EnvelopeVersion = EnvelopeVersion::V1;

impl EnvelopeVersion {
    const ALL: [EnvelopeVersion; 1] = [EnvelopeVersion::V1];

    pub fn prefix(self) -> &'static str {
        match self {
            EnvelopeVersion::V1 => v1::PREFIX,
        }
    }

    /// Finds the version whose prefix `value` starts with.
    pub fn detect(value: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| value.starts_with(v.prefix().as_bytes()))
    }
}

/// A parsed envelope: everything needed to derive the key and open the
/// ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    version: EnvelopeVersion,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    sealed: Vec<u8>,
}

impl Envelope {
    /// Creates a current-version envelope from its components.
    pub fn new(salt: [u8; SALT_LEN], nonce: [u8; NONCE_LEN], sealed: Vec<u8>) -> Self {
        Self {
            version: CURRENT_VERSION,
            salt,
            nonce,
            sealed,
        }
    }

    pub fn version(&self) -> EnvelopeVersion {
        self.version
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended.
    pub fn sealed(&self) -> &[u8] {
        &self.sealed
    }

    /// Encodes the envelope into its wire string.
    pub fn encode(&self) -> String {
        match self.version {
            EnvelopeVersion::V1 => v1::encode(&self.salt, &self.nonce, &self.sealed),
        }
    }
}

/// Cheap shape check used to decide between "try to decrypt" and "treat as
/// plaintext".
///
/// Only looks at the prefix and that something follows it; never decodes
/// base64 or touches key material.
pub fn is_envelope(value: &[u8]) -> bool {
    match EnvelopeVersion::detect(value) {
        Some(version) => value.len() > version.prefix().len(),
        None => false,
    }
}

/// Parses a wire string into an [`Envelope`].
///
/// # Errors
///
/// Returns [`ZkError::Format`] if:
/// - no known prefix is present, or nothing follows it
/// - the payload is not valid standard base64
/// - the decoded payload is too short to hold salt, nonce and tag
pub fn decode(value: &str) -> Result<Envelope> {
    let version = EnvelopeVersion::detect(value.as_bytes()).ok_or(ZkError::Format)?;
    let body = &value[version.prefix().len()..];

    if body.is_empty() {
        return Err(ZkError::Format);
    }

    match version {
        EnvelopeVersion::V1 => v1::decode(body),
    }
}
