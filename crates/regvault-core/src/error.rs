//! Error types for regvault.
//!
//! Store operations surface three logical failures (duplicate key, missing
//! record, invalid input). Everything the backing engine reports beyond that
//! is passed through as a storage error.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the registry store.
#[derive(Debug, Error)]
pub enum RegvaultError {
    #[error("Registry already exists for repo {repo_id}: {address}")]
    ConstraintViolation { repo_id: i64, address: String },

    #[error("Registry not found for repo {repo_id}: {address}")]
    RegistryNotFound { repo_id: i64, address: String },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Storage errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Secret codec error: {message}")]
    Codec { message: String },
}

/// Result type alias for regvault operations.
pub type Result<T> = std::result::Result<T, RegvaultError>;

/// Coarse classification of a [`RegvaultError`] for callers above the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The `(repo_id, address)` pair is already registered.
    ConstraintViolation,
    /// The referenced registry does not exist.
    NotFound,
    /// The caller passed an invalid value.
    Validation,
    /// The backing engine could not complete the operation.
    StorageUnavailable,
}

impl From<std::io::Error> for RegvaultError {
    fn from(err: std::io::Error) -> Self {
        RegvaultError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for RegvaultError {
    fn from(err: rusqlite::Error) -> Self {
        RegvaultError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl RegvaultError {
    /// Create a validation error for a field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RegvaultError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error for a registry key.
    pub fn not_found(repo_id: i64, address: impl Into<String>) -> Self {
        RegvaultError::RegistryNotFound {
            repo_id,
            address: address.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegvaultError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            RegvaultError::RegistryNotFound { .. } => ErrorKind::NotFound,
            RegvaultError::Validation { .. } => ErrorKind::Validation,
            RegvaultError::Database { .. }
            | RegvaultError::Io { .. }
            | RegvaultError::Codec { .. } => ErrorKind::StorageUnavailable,
        }
    }

    /// Check if the engine reported a transient lock conflict.
    ///
    /// The store never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegvaultError::Database {
                source: Some(rusqlite::Error::SqliteFailure(err, _)),
                ..
            } => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Returns true when `err` is a unique-index violation reported by SQLite.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}
