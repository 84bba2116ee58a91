//! Storage contract for registry credentials.

use super::model::Registry;
use crate::error::Result;

/// Durable CRUD for [`Registry`] records.
///
/// Implementations enforce that no two records share both `repo_id` and
/// `address`, and must do so in the backing engine rather than with an
/// application-level lock. All operations are synchronous; each one either
/// completes fully or leaves storage unchanged.
pub trait RegistryStore: Send + Sync {
    /// Insert a new registry and assign its id into `registry.id`.
    ///
    /// Fails with `ConstraintViolation` if the `(repo_id, address)` pair is
    /// already registered. Never falls back to an update.
    fn create(&self, registry: &mut Registry) -> Result<()>;

    /// Overwrite the credentials of the registry identified by `registry.id`.
    ///
    /// `repo_id` and `address` must match the stored record; they select the
    /// scope and are never rewritten. Username, password, email and token are
    /// replaced wholesale. Fails with `NotFound` when the id is unset or
    /// unknown.
    fn update(&self, registry: &Registry) -> Result<()>;

    /// Look up the registry for an exact `(repo_id, address)` pair.
    fn find(&self, repo_id: i64, address: &str) -> Result<Registry>;

    /// All registries belonging to a repository, in creation order.
    fn list(&self, repo_id: i64) -> Result<Vec<Registry>>;

    /// Remove the registry for an exact `(repo_id, address)` pair.
    fn delete(&self, repo_id: i64, address: &str) -> Result<()>;

    /// Remove every registry of a repository.
    ///
    /// Returns the number of records removed.
    fn delete_for_repo(&self, repo_id: i64) -> Result<usize>;
}
