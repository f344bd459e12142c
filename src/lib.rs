//! Zero-knowledge client-side encryption for key-value configuration values.
//!
//! Values are sealed into `$ZK$` envelopes before they leave the client, so
//! the storage service only ever sees ciphertext. Envelopes are byte-for-byte
//! compatible with every other client that speaks the same format.

mod crypto;
pub mod envelope;
mod error;
mod value;

pub use crate::crypto::{KdfParams, MIN_PASSPHRASE_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
pub use crate::envelope::{EnvelopeVersion, is_envelope};
pub use crate::error::{ErrorKind, Result, ZkError};
pub use crate::value::{StoredValue, ValueInfo};

use crate::crypto::Passphrase;
use crate::envelope::Envelope;
use tracing::debug;
use zeroize::Zeroizing;

/// Encrypts and decrypts values under a single passphrase.
///
/// Every call derives a fresh key from a fresh salt and uses a fresh nonce;
/// nothing but the passphrase is kept between calls, so a `ZkCipher` can be
/// shared freely across threads. Key derivation is deliberately expensive
/// (Argon2id, 64 MiB), so `encrypt` and `decrypt` block; run them off any
/// async executor and do not hold connections or locks across them.
#[derive(Debug)]
pub struct ZkCipher {
    passphrase: Passphrase,
}

impl ZkCipher {
    /// Validates the passphrase and builds the cipher.
    ///
    /// # Errors
    ///
    /// [`ZkError::Config`] if the passphrase is empty or shorter than
    /// [`MIN_PASSPHRASE_LEN`] UTF-8 bytes. No key derivation happens here.
    pub fn new(passphrase: Zeroizing<String>) -> Result<Self> {
        let passphrase = Passphrase::new(passphrase)?;
        Ok(Self { passphrase })
    }

    /// Same as [`ZkCipher::new`] for passphrases held as raw bytes.
    pub fn from_bytes(passphrase: Zeroizing<Vec<u8>>) -> Result<Self> {
        let passphrase = Passphrase::from_bytes(passphrase)?;
        Ok(Self { passphrase })
    }

    /// Returns `true` if `value` is shaped like a ZK envelope.
    pub fn is_envelope(value: &[u8]) -> bool {
        envelope::is_envelope(value)
    }

    /// Seals `plaintext` into a `$ZK$` envelope string.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let salt = crypto::generate_salt()?;
        let nonce = crypto::generate_nonce()?;
        self.encrypt_with(plaintext, salt, nonce)
    }

    pub(crate) fn encrypt_with(
        &self,
        plaintext: &[u8],
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
    ) -> Result<String> {
        debug!(plaintext_len = plaintext.len(), "encrypting value");

        let key = crypto::derive_key(&self.passphrase, &salt, KdfParams::V1)?;
        let sealed = crypto::seal(key.as_bytes(), &nonce, plaintext)?;
        drop(key);

        Ok(Envelope::new(salt, nonce, sealed).encode())
    }

    /// Opens a `$ZK$` envelope string.
    ///
    /// # Errors
    ///
    /// - [`ZkError::Format`] if `value` is not a well-formed envelope. Nothing
    ///   is derived in that case.
    /// - [`ZkError::Decryption`] if the passphrase is wrong or the envelope
    ///   was tampered with.
    pub fn decrypt(&self, value: &str) -> Result<Zeroizing<Vec<u8>>> {
        let envelope = envelope::decode(value)?;
        debug!(
            version = ?envelope.version(),
            sealed_len = envelope.sealed().len(),
            "decrypting value"
        );

        let key = crypto::derive_key(&self.passphrase, envelope.salt(), KdfParams::V1)?;
        crypto::open(key.as_bytes(), envelope.nonce(), envelope.sealed())
    }

    /// Write hook: the bytes to store for `raw` when ZK mode is on.
    pub fn seal_value(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encrypt(raw)?.into_bytes())
    }

    /// Read hook: decrypts envelopes and passes everything else through.
    ///
    /// Values without the envelope prefix (or that are not UTF-8) are returned
    /// unchanged as [`StoredValue::Plain`]. Once the prefix matches, the value
    /// must decrypt: a damaged envelope is [`ZkError::Format`], a wrong
    /// passphrase or tampering is [`ZkError::Decryption`], and neither ever
    /// yields the stored bytes as if they were plaintext.
    pub fn open_value(&self, stored: &[u8]) -> Result<StoredValue> {
        if !envelope::is_envelope(stored) {
            return Ok(StoredValue::Plain(stored.to_vec()));
        }

        let Ok(text) = std::str::from_utf8(stored) else {
            debug!("envelope prefix on non-UTF-8 value, treating as plaintext");
            return Ok(StoredValue::Plain(stored.to_vec()));
        };

        let plaintext = self.decrypt(text)?;
        Ok(StoredValue::Decrypted(plaintext))
    }
}
