use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;
use zeroize::Zeroizing;

use super::{KEY_LEN, SALT_LEN, passphrase::Passphrase};
use crate::error::{Result, ZkError};

/// Argon2id cost parameters.
///
/// These are part of the envelope wire contract: every implementation must
/// derive the same key for the same passphrase and salt, so the values are
/// tied to the envelope version instead of being configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl KdfParams {
    /// Parameters for `$ZK$` envelopes.
    pub const V1: KdfParams = KdfParams {
        mem_cost_kib: 64 * 1024, // 64 MiB
        time_cost: 1,
        parallelism: 4,
    };

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn to_argon2(self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.mem_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| ZkError::Internal(format!("failed to construct Argon2 params: {e}")))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// A 256-bit key derived for a single encrypt or decrypt call.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives the envelope key from `passphrase` and `salt` with Argon2id.
///
/// Blocks for the duration of the derivation and allocates
/// `mem_cost_kib` KiB of working memory.
pub fn derive_key(
    passphrase: &Passphrase,
    salt: &[u8; SALT_LEN],
    params: KdfParams,
) -> Result<DerivedKey> {
    let argon2 = params.to_argon2()?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.expose(), salt, &mut key[..])
        .map_err(|e| ZkError::Internal(format!("argon2 key derivation failed: {e}")))?;

    Ok(DerivedKey(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        mem_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    };

    fn pass(s: &str) -> Passphrase {
        Passphrase::new(Zeroizing::new(s.to_string())).unwrap()
    }

    #[test]
    fn v1_params_are_fixed() {
        assert_eq!(KdfParams::V1.mem_cost_kib(), 65536);
        assert_eq!(KdfParams::V1.time_cost(), 1);
        assert_eq!(KdfParams::V1.parallelism(), 4);
    }

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; SALT_LEN];
        let p = pass("a passphrase of decent length");

        let k1 = derive_key(&p, &salt, KdfParams::V1).unwrap();
        let k2 = derive_key(&p, &salt, KdfParams::V1).unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn kdf_matches_known_answer() {
        let salt: [u8; SALT_LEN] = core::array::from_fn(|i| i as u8);
        let key = derive_key(&pass("sixteen-byte-pw!"), &salt, KdfParams::V1).unwrap();

        let expected: [u8; KEY_LEN] = [
            0x53, 0xab, 0x49, 0xfc, 0x52, 0x65, 0x70, 0xed, 0x04, 0x98, 0x02, 0x2c, 0xfd, 0xbf,
            0x3a, 0x7d, 0xc7, 0xf1, 0x4c, 0xc9, 0xff, 0xb9, 0xc0, 0x31, 0x4f, 0xf1, 0x49, 0x9d,
            0x44, 0x09, 0x28, 0x61,
        ];
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn kdf_salt_affects_output() {
        let p = pass("a passphrase of decent length");

        let k1 = derive_key(&p, &[1u8; SALT_LEN], FAST).unwrap();
        let k2 = derive_key(&p, &[2u8; SALT_LEN], FAST).unwrap();

        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; SALT_LEN];
        let p = pass("a passphrase of decent length");

        let slow = KdfParams {
            mem_cost_kib: 2048,
            ..FAST
        };

        let k1 = derive_key(&p, &salt, FAST).unwrap();
        let k2 = derive_key(&p, &salt, slow).unwrap();

        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn kdf_invalid_params_fail_as_internal() {
        let broken = KdfParams {
            mem_cost_kib: 0,
            time_cost: 0,
            parallelism: 0,
        };
        let p = pass("a passphrase of decent length");

        match derive_key(&p, &[0u8; SALT_LEN], broken) {
            Err(ZkError::Internal(msg)) => assert!(msg.contains("Argon2 params")),
            other => panic!("expected Internal error, got: {other:?}"),
        }
    }

    #[test]
    fn derived_key_debug_is_redacted() {
        let k = derive_key(&pass("a passphrase of decent length"), &[0u8; SALT_LEN], FAST).unwrap();
        assert_eq!(format!("{k:?}"), "DerivedKey([REDACTED])");
    }
}
