//! Curve25519 key types and seed-deterministic key derivation.
//!
//! Every key pair and preshared key in a WGForge topology is derived from a
//! single [`Seed`] with HKDF-SHA256, domain-separated per peer index. The
//! seed is the only secret that needs to be persisted; everything else is
//! reproducible from it.

pub mod derive;
pub mod error;
mod keys;
mod seed;

pub use derive::{derive_keypair, derive_preshared};
pub use error::{KeyError, Result};
pub use keys::{KeyPair, PresharedKey, PrivateKey, PublicKey, KEY_SIZE};
pub use seed::{Seed, DEFAULT_SEED_LEN, MIN_SEED_LEN};
