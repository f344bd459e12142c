//! Cryptographic primitives for ZK envelopes.
//!
//! Provides passphrase handling, Argon2id key derivation and AES-256-GCM.

pub mod aead;
pub mod kdf;
pub mod passphrase;

pub use aead::{generate_nonce, generate_salt, open, seal};
pub use kdf::{KdfParams, derive_key};
pub use passphrase::{MIN_PASSPHRASE_LEN, Passphrase};

/// Length of the Argon2id salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the AES-GCM nonce (12 bytes).
pub const NONCE_LEN: usize = 12;
/// Length of the derived key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;
