use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZkError>;

/// Failure classes surfaced by the ZK layer.
///
/// `Format` and `Decryption` deliberately carry no detail: every way a
/// candidate envelope can be malformed collapses into `Format`, and every
/// way an authentic-looking envelope can fail to open collapses into
/// `Decryption`.
#[derive(Debug, Error)]
pub enum ZkError {
    /// Passphrase missing or too short. Fatal to constructing a cipher.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input is not a well-formed ZK envelope.
    #[error("value is not a valid ZK envelope")]
    Format,

    /// Wrong passphrase or corrupted envelope.
    #[error("unable to decrypt value: wrong passphrase or corrupted data")]
    Decryption,

    /// Unexpected failure inside a crypto primitive or the OS RNG.
    #[error("internal crypto error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`ZkError`], convenient for callers that only
/// need to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Format,
    Decryption,
    Internal,
}

impl ZkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZkError::Config(_) => ErrorKind::Config,
            ZkError::Format => ErrorKind::Format,
            ZkError::Decryption => ErrorKind::Decryption,
            ZkError::Internal(_) => ErrorKind::Internal,
        }
    }
}
