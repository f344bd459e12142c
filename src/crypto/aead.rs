use super::{KEY_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, ZkError};
use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use getrandom::fill;
use zeroize::Zeroizing;

/// Fill buffer with cryptographically secure random bytes
pub fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|e| ZkError::Internal(format!("OS random generator unavailable: {e}")))
}

/// Generate a fresh Argon2id salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Generate a fresh AES-GCM nonce
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    secure_random(&mut nonce)?;
    Ok(nonce)
}

/// Encrypt plaintext with AES-256-GCM, no associated data.
///
/// Returns `ciphertext || tag`.
pub fn seal(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| ZkError::Internal("AES-GCM encryption failed".to_string()))
}

/// Decrypt and authenticate `ciphertext || tag`.
///
/// Every failure is reported as [`ZkError::Decryption`].
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    sealed: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if sealed.len() < TAG_LEN {
        return Err(ZkError::Decryption);
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| ZkError::Decryption)?;
    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x01; NONCE_LEN];

    #[test]
    fn seal_appends_tag() {
        let sealed = seal(&KEY, &NONCE, b"hello").unwrap();
        assert_eq!(sealed.len(), 5 + TAG_LEN);
        assert_ne!(&sealed[..5], b"hello");
    }

    #[test]
    fn empty_plaintext_is_tag_only() {
        let sealed = seal(&KEY, &NONCE, b"").unwrap();
        assert_eq!(sealed.len(), TAG_LEN);
        assert!(open(&KEY, &NONCE, &sealed).unwrap().is_empty());
    }

    #[test]
    fn matches_gcm_reference_vector() {
        // AES-256-GCM, zero key, zero IV, empty plaintext (McGrew-Viega GCM test case 13).
        let sealed = seal(&[0u8; KEY_LEN], &[0u8; NONCE_LEN], b"").unwrap();
        let tag: [u8; TAG_LEN] = [
            0x53, 0x0f, 0x8a, 0xfb, 0xc7, 0x45, 0x36, 0xb9, 0xa9, 0x63, 0xb4, 0xf1, 0xc4, 0xcb,
            0x73, 0x8b,
        ];
        assert_eq!(sealed, tag);
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = seal(&KEY, &NONCE, b"secret").unwrap();
        let wrong = [0x43u8; KEY_LEN];
        assert!(matches!(open(&wrong, &NONCE, &sealed), Err(ZkError::Decryption)));
    }

    #[test]
    fn wrong_nonce_fails() {
        let sealed = seal(&KEY, &NONCE, b"secret").unwrap();
        let wrong = [0x02u8; NONCE_LEN];
        assert!(matches!(open(&KEY, &wrong, &sealed), Err(ZkError::Decryption)));
    }

    #[test]
    fn truncated_input_fails() {
        let sealed = seal(&KEY, &NONCE, b"secret").unwrap();
        for len in 0..sealed.len() {
            assert!(
                matches!(open(&KEY, &NONCE, &sealed[..len]), Err(ZkError::Decryption)),
                "length {len} should not open"
            );
        }
    }

    #[test]
    fn salts_and_nonces_are_fresh() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
        assert_ne!(generate_nonce().unwrap(), generate_nonce().unwrap());
    }

    proptest! {
        #[test]
        fn seal_open_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..512)) {
            let sealed = seal(&KEY, &NONCE, &plaintext).unwrap();
            let opened = open(&KEY, &NONCE, &sealed).unwrap();
            prop_assert_eq!(&*opened, &plaintext);
        }

        #[test]
        fn any_bit_flip_is_rejected(
            plaintext in proptest::collection::vec(any::<u8>(), 0..64),
            bit in any::<usize>(),
        ) {
            let mut sealed = seal(&KEY, &NONCE, &plaintext).unwrap();
            let bit = bit % (sealed.len() * 8);
            sealed[bit / 8] ^= 1 << (bit % 8);
            prop_assert!(matches!(open(&KEY, &NONCE, &sealed), Err(ZkError::Decryption)));
        }
    }
}
