//! regvault - Persistent store for CI container registry credentials.
//!
//! A CI repository keeps the credentials its pipelines need to pull images
//! from private container registries. This crate stores them durably, one
//! record per `(repo_id, address)` pair, and answers the lookups pipeline
//! execution makes before pulling an image.
//!
//! # Example
//!
//! ```rust,no_run
//! use regvault::{Registry, RegistryStore, SqliteRegistryStore};
//!
//! fn main() -> regvault::Result<()> {
//!     let store = SqliteRegistryStore::open_at("/var/lib/ci/registry.db")?;
//!
//!     let mut registry = Registry::new(1, "index.docker.io")
//!         .with_username("foo")
//!         .with_password("bar");
//!     store.create(&mut registry)?;
//!
//!     let found = store.find(1, "index.docker.io")?;
//!     println!("{} credentials for repo {}", found.address, found.repo_id);
//!
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod testing;

// Re-export commonly used types
pub use codec::{PlaintextCodec, SecretCodec};
pub use config::StoreConfig;
pub use error::{ErrorKind, RegvaultError, Result};
pub use registry::{Registry, RegistryStore, SqliteRegistryStore};
