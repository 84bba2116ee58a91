//! Encoding of secret fields at the storage boundary.
//!
//! The store runs `password` and `token` through a [`SecretCodec`] on every
//! write and read. Whether secrets are encrypted at rest is decided by the
//! codec the store is constructed with, not by the store itself.

use crate::error::Result;

/// Reversible transform applied to secret values before they reach storage.
pub trait SecretCodec: Send + Sync {
    /// Transform a caller-supplied secret into its stored form.
    fn encode(&self, plaintext: &str) -> Result<String>;

    /// Recover the caller-visible secret from its stored form.
    fn decode(&self, stored: &str) -> Result<String>;
}

/// Stores secrets exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCodec;

impl SecretCodec for PlaintextCodec {
    fn encode(&self, plaintext: &str) -> Result<String> {
        Ok(plaintext.to_string())
    }

    fn decode(&self, stored: &str) -> Result<String> {
        Ok(stored.to_string())
    }
}
