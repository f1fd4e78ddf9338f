#[cfg(feature = "couch-store")]
pub mod couchdb;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{MatchRecordEntity, MatchSnapshotEntity, RoleAssignmentEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for match fixtures, live snapshots
/// and role assignments.
///
/// Fixture and role data is read-only from this service's perspective; the
/// snapshot is the single document written back, replaced whole on every
/// mutation. `save_match`/`save_role` exist for operational tooling and test
/// seeding, mirroring what the external administration layer writes.
pub trait MatchStore: Send + Sync {
    /// Fetch a match fixture record.
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchRecordEntity>>>;
    /// List every fixture record.
    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>>;
    /// Upsert a fixture record.
    fn save_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch the last persisted snapshot for a match.
    fn find_snapshot(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<MatchSnapshotEntity>>>;
    /// Overwrite the persisted snapshot for a match.
    fn save_snapshot(&self, snapshot: MatchSnapshotEntity)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Resolve the role assigned to a user for a match.
    fn find_role(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RoleAssignmentEntity>>>;
    /// Upsert a role assignment.
    fn save_role(&self, role: RoleAssignmentEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap readiness probe against the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
