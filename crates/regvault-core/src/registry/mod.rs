//! Registry credentials and their storage.
//!
//! A registry record holds the credentials (address, username, password,
//! email, token) a repository's pipeline uses to pull from a container image
//! registry. Each record belongs to one repository, and an address may be
//! registered at most once per repository.
//!
//! - [`Registry`]: the entity
//! - [`RegistryStore`]: the storage contract
//! - [`SqliteRegistryStore`]: the SQLite implementation

pub mod model;
pub mod sqlite;
pub mod store;

pub use model::Registry;
pub use sqlite::SqliteRegistryStore;
pub use store::RegistryStore;
