//! Passphrase validation and ownership.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{Result, ZkError};

/// Minimum passphrase length in UTF-8 bytes.
pub const MIN_PASSPHRASE_LEN: usize = 16;

/// A validated passphrase. The bytes are wiped when it is dropped.
pub struct Passphrase {
    bytes: Zeroizing<Vec<u8>>,
}

impl Passphrase {
    /// Validates and takes ownership of `secret`.
    ///
    /// The `String` buffer is reused, so no unzeroed copy is left behind.
    ///
    /// # Errors
    ///
    /// Returns [`ZkError::Config`] if the passphrase is empty or shorter than
    /// [`MIN_PASSPHRASE_LEN`] bytes.
    pub fn new(mut secret: Zeroizing<String>) -> Result<Self> {
        let bytes = std::mem::take(&mut *secret).into_bytes();
        Self::from_bytes(Zeroizing::new(bytes))
    }

    /// Same as [`Passphrase::new`] for callers that already hold raw bytes.
    pub fn from_bytes(bytes: Zeroizing<Vec<u8>>) -> Result<Self> {
        validate(&bytes)?;
        Ok(Self { bytes })
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

fn validate(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(ZkError::Config("passphrase must not be empty".to_string()));
    }

    if bytes.len() < MIN_PASSPHRASE_LEN {
        return Err(ZkError::Config(format!(
            "passphrase must be at least {MIN_PASSPHRASE_LEN} bytes (got {})",
            bytes.len()
        )));
    }

    Ok(())
}
