//! Seed-deterministic key derivation.
//!
//! Key material is expanded from the seed with HKDF-SHA256 so that two
//! independent implementations reproduce byte-identical keys:
//!
//! - extract: `salt = "wgforge/topology/v1"`, `ikm = seed`
//! - expand: `info = tag || index` with `tag` either `"identity"` or
//!   `"preshared"` and `index` big-endian `u32`, output length 32
//!
//! Identity output is clamped per Curve25519 before the public key is
//! computed; preshared output is used as-is. Index 0 is the server, 1..N
//! the clients. The derivation is one-way (HKDF does not reveal the seed)
//! and domain-separated per tag and index, so rotating one key type never
//! disturbs the other and no key is recoverable from a sibling index.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{KeyError, Result};
use crate::keys::{KeyPair, PresharedKey, PrivateKey, KEY_SIZE};
use crate::seed::Seed;

/// HKDF extract salt. Changing this value changes every derived key.
pub const DERIVE_SALT: &[u8] = b"wgforge/topology/v1";

/// Domain tag for identity (Curve25519) key derivation.
const IDENTITY_TAG: &[u8] = b"identity";

/// Domain tag for preshared key derivation.
const PRESHARED_TAG: &[u8] = b"preshared";

/// Derives the Curve25519 key pair for a peer index.
///
/// Identical `(seed, index)` always yields the identical key pair.
///
/// # Errors
///
/// Returns [`KeyError::InvalidSeed`] if the seed is shorter than the
/// minimum length.
pub fn derive_keypair(seed: &Seed, index: u32) -> Result<KeyPair> {
    let mut okm = expand(seed, IDENTITY_TAG, index)?;
    clamp(&mut okm);
    let keypair = KeyPair::from_private_key(PrivateKey::from_bytes_array(okm));
    okm.zeroize();
    Ok(keypair)
}

/// Derives the preshared key for a client index.
///
/// # Errors
///
/// Returns [`KeyError::InvalidSeed`] if the seed is shorter than the
/// minimum length.
pub fn derive_preshared(seed: &Seed, index: u32) -> Result<PresharedKey> {
    let mut okm = expand(seed, PRESHARED_TAG, index)?;
    let psk = PresharedKey::from_bytes_array(okm);
    okm.zeroize();
    Ok(psk)
}

/// One HKDF-SHA256 extract-and-expand call.
fn expand(seed: &Seed, tag: &[u8], index: u32) -> Result<[u8; KEY_SIZE]> {
    seed.check_length()?;

    let hk = Hkdf::<Sha256>::new(Some(DERIVE_SALT), seed.as_bytes());

    let mut info = Vec::with_capacity(tag.len() + 4);
    info.extend_from_slice(tag);
    info.extend_from_slice(&index.to_be_bytes());

    let mut okm = [0u8; KEY_SIZE];
    hk.expand(&info, &mut okm)
        .map_err(|e| KeyError::Derivation(e.to_string()))?;
    Ok(okm)
}

/// Standard Curve25519 private-key clamping: clear the low 3 bits, clear
/// the top bit, set the second-highest bit.
fn clamp(bytes: &mut [u8; KEY_SIZE]) {
    bytes[0] &= 248;
    bytes[KEY_SIZE - 1] &= 127;
    bytes[KEY_SIZE - 1] |= 64;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use test_case::test_case;

    use super::*;
    use crate::seed::MIN_SEED_LEN;

    fn test_seed() -> Seed {
        Seed::from_bytes(&[0xA5u8; 64])
    }

    #[test]
    fn derivation_is_deterministic() {
        let seed = test_seed();
        let a = derive_keypair(&seed, 3).expect("derive failed");
        let b = derive_keypair(&seed, 3).expect("derive failed");
        assert_eq!(a.private_key(), b.private_key());
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn preshared_derivation_is_deterministic() {
        let seed = test_seed();
        let a = derive_preshared(&seed, 1).expect("derive failed");
        let b = derive_preshared(&seed, 1).expect("derive failed");
        assert_eq!(a, b);
    }

    #[test]
    fn indices_are_independent() {
        let seed = test_seed();
        let mut seen = HashSet::new();
        for index in 0..300 {
            let pair = derive_keypair(&seed, index).expect("derive failed");
            assert!(
                seen.insert(*pair.public_key().as_bytes()),
                "public key collision at index {index}"
            );
        }
    }

    #[test]
    fn preshared_indices_are_independent() {
        let seed = test_seed();
        let mut seen = HashSet::new();
        for index in 1..=300 {
            let psk = derive_preshared(&seed, index).expect("derive failed");
            assert!(
                seen.insert(*psk.as_bytes()),
                "preshared key collision at index {index}"
            );
        }
    }

    #[test]
    fn identity_and_preshared_domains_are_separated() {
        let seed = test_seed();
        for index in 0..32 {
            let pair = derive_keypair(&seed, index).expect("derive failed");
            let psk = derive_preshared(&seed, index).expect("derive failed");
            assert_ne!(pair.private_key().as_bytes(), psk.as_bytes());
        }
    }

    #[test]
    fn different_seeds_yield_different_keys() {
        let a = derive_keypair(&Seed::from_bytes(&[1u8; 32]), 0).expect("derive failed");
        let b = derive_keypair(&Seed::from_bytes(&[2u8; 32]), 0).expect("derive failed");
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(7)]
    #[test_case(255)]
    fn derived_private_keys_are_clamped(index: u32) {
        let pair = derive_keypair(&test_seed(), index).expect("derive failed");
        let bytes = pair.private_key().as_bytes();
        assert_eq!(bytes[0] & 0b0000_0111, 0, "low 3 bits must be clear");
        assert_eq!(bytes[31] & 0b1000_0000, 0, "top bit must be clear");
        assert_eq!(bytes[31] & 0b0100_0000, 0b0100_0000, "bit 254 must be set");
    }

    #[test]
    fn short_seed_is_rejected() {
        let seed = Seed::from_bytes(&[0u8; MIN_SEED_LEN - 1]);
        assert!(matches!(
            derive_keypair(&seed, 0),
            Err(KeyError::InvalidSeed { .. })
        ));
        assert!(matches!(
            derive_preshared(&seed, 1),
            Err(KeyError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn empty_seed_is_rejected() {
        let seed = Seed::from_bytes(&[]);
        assert!(derive_keypair(&seed, 0).is_err());
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn any_valid_seed_derives_clamped_keys(
                bytes in proptest::collection::vec(any::<u8>(), MIN_SEED_LEN..128),
                index in 0u32..1024,
            ) {
                let seed = Seed::from_bytes(&bytes);
                let pair = derive_keypair(&seed, index).expect("derive failed");
                let key = pair.private_key().as_bytes();
                prop_assert_eq!(key[0] & 7, 0);
                prop_assert_eq!(key[31] & 128, 0);
                prop_assert_eq!(key[31] & 64, 64);
            }
        }
    }
}
