//! SQLite-backed registry store.

use super::model::Registry;
use super::store::RegistryStore;
use crate::codec::{PlaintextCodec, SecretCodec};
use crate::config::StoreConfig;
use crate::error::{is_unique_violation, RegvaultError, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

const SELECT_COLUMNS: &str = "SELECT id, repo_id, address, username, password, email, token
     FROM registries";

/// Registry store on a single SQLite database.
///
/// The `(repo_id, address)` uniqueness is a unique index in the database, so
/// it holds across every connection and process that opens the same file.
/// The mutex only guards this instance's connection handle.
pub struct SqliteRegistryStore {
    conn: Arc<Mutex<Connection>>,
    codec: Arc<dyn SecretCodec>,
}

impl SqliteRegistryStore {
    /// Open (or create) a store at `db_path` with default settings.
    pub fn open_at(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(db_path, StoreConfig::default())
    }

    /// Open (or create) a store at `db_path` with custom connection settings.
    pub fn with_config(db_path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        Self::with_codec(db_path, config, Arc::new(PlaintextCodec))
    }

    /// Open (or create) a store whose secrets pass through `codec`.
    ///
    /// Creates the database, its parent directories and the schema if they
    /// don't exist.
    pub fn with_codec(
        db_path: impl AsRef<Path>,
        config: StoreConfig,
        codec: Arc<dyn SecretCodec>,
    ) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| RegvaultError::Io {
                    message: format!("Failed to create store directory: {}", e),
                    path: Some(parent.to_path_buf()),
                    source: Some(e),
                })?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| RegvaultError::Database {
            message: format!("Failed to open registry database: {}", e),
            source: Some(e),
        })?;
        Self::configure_connection(&conn, &config, config.wal)?;
        Self::ensure_schema(&conn)?;

        debug!("Opened registry store at {}", db_path.display());

        Ok(Self::from_connection(conn, codec))
    }

    /// Open a private in-memory store. Its contents vanish when it is dropped.
    pub fn open_in_memory() -> Result<Self> {
        Self::in_memory_with_codec(Arc::new(PlaintextCodec))
    }

    /// Open a private in-memory store whose secrets pass through `codec`.
    pub fn in_memory_with_codec(codec: Arc<dyn SecretCodec>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn, &StoreConfig::default(), false)?;
        Self::ensure_schema(&conn)?;
        Ok(Self::from_connection(conn, codec))
    }

    fn from_connection(conn: Connection, codec: Arc<dyn SecretCodec>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            codec,
        }
    }

    fn configure_connection(conn: &Connection, config: &StoreConfig, wal: bool) -> Result<()> {
        // Set before switching journal mode, which itself needs the lock.
        conn.busy_timeout(config.busy_timeout)?;
        if wal {
            conn.execute_batch("PRAGMA journal_mode=WAL;\nPRAGMA synchronous=NORMAL;")?;
        }
        Ok(())
    }

    fn ensure_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS registries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                repo_id INTEGER NOT NULL,
                address TEXT NOT NULL,
                username TEXT NOT NULL DEFAULT '',
                password TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                token TEXT NOT NULL DEFAULT ''
            );

            CREATE UNIQUE INDEX IF NOT EXISTS ux_registries_repo_address
                ON registries(repo_id, address);",
        )
        .map_err(|e| RegvaultError::Database {
            message: format!("Failed to initialize registry schema: {}", e),
            source: Some(e),
        })?;
        Ok(())
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RegvaultError::Database {
            message: "Failed to acquire registry connection lock".to_string(),
            source: None,
        })
    }

    fn registry_from_row(row: &Row<'_>) -> rusqlite::Result<Registry> {
        Ok(Registry {
            id: Some(row.get(0)?),
            repo_id: row.get(1)?,
            address: row.get(2)?,
            username: row.get(3)?,
            password: row.get(4)?,
            email: row.get(5)?,
            token: row.get(6)?,
        })
    }

    /// Turn a row as stored into the value callers see.
    fn decode_secrets(&self, mut registry: Registry) -> Result<Registry> {
        registry.password = self.codec.decode(&registry.password)?;
        registry.token = self.codec.decode(&registry.token)?;
        Ok(registry)
    }
}

impl RegistryStore for SqliteRegistryStore {
    fn create(&self, registry: &mut Registry) -> Result<()> {
        registry.validate()?;
        let password = self.codec.encode(&registry.password)?;
        let token = self.codec.encode(&registry.token)?;

        let conn = self.lock_conn()?;
        let inserted = conn.execute(
            "INSERT INTO registries (repo_id, address, username, password, email, token)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                registry.repo_id,
                registry.address,
                registry.username,
                password,
                registry.email,
                token
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Rejected duplicate registry for repo {}: {}",
                    registry.repo_id, registry.address
                );
                return Err(RegvaultError::ConstraintViolation {
                    repo_id: registry.repo_id,
                    address: registry.address.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        drop(conn);
        registry.id = Some(id);

        debug!(
            "Created registry {} for repo {}: {}",
            id, registry.repo_id, registry.address
        );

        Ok(())
    }

    fn update(&self, registry: &Registry) -> Result<()> {
        let id = match registry.id {
            Some(id) => id,
            None => return Err(RegvaultError::not_found(registry.repo_id, &registry.address)),
        };
        let password = self.codec.encode(&registry.password)?;
        let token = self.codec.encode(&registry.token)?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let scope: Option<(i64, String)> = tx
            .query_row(
                "SELECT repo_id, address FROM registries WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (repo_id, address) = match scope {
            Some(scope) => scope,
            None => return Err(RegvaultError::not_found(registry.repo_id, &registry.address)),
        };
        if repo_id != registry.repo_id {
            return Err(RegvaultError::validation(
                "repo_id",
                format!(
                    "registry {} belongs to repo {}, not {}",
                    id, repo_id, registry.repo_id
                ),
            ));
        }
        if address != registry.address {
            return Err(RegvaultError::validation(
                "address",
                format!(
                    "registry {} is registered for {}, not {}",
                    id, address, registry.address
                ),
            ));
        }

        tx.execute(
            "UPDATE registries SET username = ?1, password = ?2, email = ?3, token = ?4
             WHERE id = ?5",
            params![registry.username, password, registry.email, token, id],
        )?;
        tx.commit()?;

        debug!(
            "Updated registry {} for repo {}: {}",
            id, registry.repo_id, registry.address
        );

        Ok(())
    }

    fn find(&self, repo_id: i64, address: &str) -> Result<Registry> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("{} WHERE repo_id = ?1 AND address = ?2", SELECT_COLUMNS),
                params![repo_id, address],
                Self::registry_from_row,
            )
            .optional()?;
        drop(conn);

        match row {
            Some(registry) => self.decode_secrets(registry),
            None => Err(RegvaultError::not_found(repo_id, address)),
        }
    }

    fn list(&self, repo_id: i64) -> Result<Vec<Registry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE repo_id = ?1 ORDER BY id",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![repo_id], Self::registry_from_row)?;

        let mut registries = Vec::new();
        for row in rows {
            registries.push(self.decode_secrets(row?)?);
        }

        Ok(registries)
    }

    fn delete(&self, repo_id: i64, address: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let rows = conn.execute(
            "DELETE FROM registries WHERE repo_id = ?1 AND address = ?2",
            params![repo_id, address],
        )?;

        if rows == 0 {
            return Err(RegvaultError::not_found(repo_id, address));
        }

        debug!("Deleted registry for repo {}: {}", repo_id, address);
        Ok(())
    }

    fn delete_for_repo(&self, repo_id: i64) -> Result<usize> {
        let conn = self.lock_conn()?;
        let rows = conn.execute(
            "DELETE FROM registries WHERE repo_id = ?1",
            params![repo_id],
        )?;

        if rows > 0 {
            debug!("Deleted {} registries for repo {}", rows, repo_id);
        }

        Ok(rows)
    }
}
