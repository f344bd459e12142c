//! Read/write hooks for a key-value client running in ZK mode.

use serde::Serialize;
use zeroize::Zeroizing;

use crate::envelope;

/// A value as handed back to the KV client after a read.
#[derive(Debug)]
pub enum StoredValue {
    /// The stored bytes were not an envelope and are returned unchanged.
    Plain(Vec<u8>),
    /// The stored bytes were an envelope and decrypted successfully.
    Decrypted(Zeroizing<Vec<u8>>),
}

impl StoredValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            StoredValue::Plain(bytes) => bytes.as_slice(),
            StoredValue::Decrypted(bytes) => bytes.as_slice(),
        }
    }

    pub fn was_encrypted(&self) -> bool {
        matches!(self, StoredValue::Decrypted(_))
    }
}

/// Metadata a client can report for a stored value without any key material.
///
/// Detection is purely client-side prefix sniffing; nothing here is ever
/// reported by, or sent to, the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueInfo {
    pub zk_encrypted: bool,
    pub size: usize,
}

impl ValueInfo {
    pub fn inspect(stored: &[u8]) -> Self {
        Self {
            zk_encrypted: envelope::is_envelope(stored),
            size: stored.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_plaintext() {
        let info = ValueInfo::inspect(b"plain value");
        assert!(!info.zk_encrypted);
        assert_eq!(info.size, 11);
    }

    #[test]
    fn inspect_envelope_shape() {
        let info = ValueInfo::inspect(b"$ZK$AAAA");
        assert!(info.zk_encrypted);
        assert_eq!(info.size, 8);
    }

    #[test]
    fn inspect_serializes_as_json() {
        let json = serde_json::to_string(&ValueInfo::inspect(b"$ZK$")).unwrap();
        assert_eq!(json, r#"{"zk_encrypted":false,"size":4}"#);
    }

    #[test]
    fn stored_value_accessors() {
        let plain = StoredValue::Plain(b"abc".to_vec());
        assert_eq!(plain.as_bytes(), b"abc");
        assert!(!plain.was_encrypted());

        let dec = StoredValue::Decrypted(Zeroizing::new(b"xyz".to_vec()));
        assert_eq!(dec.as_bytes(), b"xyz");
        assert!(dec.was_encrypted());
    }
}
