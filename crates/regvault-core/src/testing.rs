//! Isolated store instances for tests.
//!
//! Every [`TestStore`] gets its own database file in a private temporary
//! directory, so uniqueness checks in one test never see rows from another.
//! Dropping the `TestStore` closes the connection and deletes the directory.

use crate::codec::SecretCodec;
use crate::config::StoreConfig;
use crate::error::{RegvaultError, Result};
use crate::registry::SqliteRegistryStore;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A freshly provisioned store that cleans itself up on drop.
pub struct TestStore {
    // Declared before `dir` so the connection closes before the files go.
    store: SqliteRegistryStore,
    db_path: PathBuf,
    dir: TempDir,
}

impl TestStore {
    /// Provision a new store with an empty schema.
    pub fn new() -> Result<Self> {
        let (dir, db_path) = Self::provision()?;
        let store = SqliteRegistryStore::open_at(&db_path)?;
        Ok(Self {
            store,
            db_path,
            dir,
        })
    }

    /// Provision a new store whose secrets pass through `codec`.
    pub fn with_codec(codec: Arc<dyn SecretCodec>) -> Result<Self> {
        let (dir, db_path) = Self::provision()?;
        let store = SqliteRegistryStore::with_codec(&db_path, StoreConfig::default(), codec)?;
        Ok(Self {
            store,
            db_path,
            dir,
        })
    }

    fn provision() -> Result<(TempDir, PathBuf)> {
        let dir = tempfile::Builder::new()
            .prefix("regvault-test-")
            .tempdir()
            .map_err(|e| RegvaultError::Io {
                message: format!("Failed to create test store directory: {}", e),
                path: None,
                source: Some(e),
            })?;
        let db_path = dir.path().join(StoreConfig::DB_FILENAME);
        Ok((dir, db_path))
    }

    /// Path of the backing database file.
    ///
    /// Open extra stores on it to exercise several connections at once.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Directory removed when this store is dropped.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Deref for TestStore {
    type Target = SqliteRegistryStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
