//! The secret seed from which all key material is derived.

use std::fmt;

use base64::Engine;
use rand_core::{OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyError, Result};

/// Minimum accepted seed length in bytes.
///
/// Seeds shorter than this are rejected rather than padded; a short seed
/// would silently weaken every key derived from it.
pub const MIN_SEED_LEN: usize = 16;

/// Default seed length in bytes (2048 bits).
pub const DEFAULT_SEED_LEN: usize = 256;

/// The secret seed for a topology.
///
/// This is the only piece of cryptographic state that must survive across
/// regenerations: every private key and preshared key is reproducible from
/// the seed plus the generation parameters. The buffer is overwritten with
/// zeroes when it falls out of scope.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Creates a seed from raw bytes.
    ///
    /// Length is not checked here; derivation rejects seeds shorter than
    /// [`MIN_SEED_LEN`] with [`KeyError::InvalidSeed`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Decodes a seed from its base64 persistence form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid base64.
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| KeyError::InvalidBase64(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Generates a fresh random seed of `len` bytes from the OS CSPRNG.
    ///
    /// This is the only place randomness enters the system; the derivation
    /// engine itself is a pure function of the seed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidSeed`] if `len` is below [`MIN_SEED_LEN`].
    pub fn generate(len: usize) -> Result<Self> {
        if len < MIN_SEED_LEN {
            return Err(KeyError::InvalidSeed {
                length: len,
                minimum: MIN_SEED_LEN,
            });
        }
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Ok(Self(bytes))
    }

    /// Encodes the seed as base64 for persistence.
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }

    /// Returns the seed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the seed length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the seed is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that the seed is long enough to derive keys from.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidSeed`] if the seed is shorter than
    /// [`MIN_SEED_LEN`].
    pub fn check_length(&self) -> Result<()> {
        if self.0.len() < MIN_SEED_LEN {
            return Err(KeyError::InvalidSeed {
                length: self.0.len(),
                minimum: MIN_SEED_LEN,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("len", &self.0.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Seed {}
