use crate::model::{ActaUpdate, NewActa};
use crate::StorageResult;
use actas_types::{Acta, ActaId, OrganizationId, UserId, UserProfile};
use async_trait::async_trait;

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Storage interface for acta documents and requester identities.
///
/// Writes to a document go through `update_acta` with the revision the
/// caller read; a stale revision yields `StorageError::Conflict` and the
/// caller re-reads and retries.
#[async_trait]
pub trait ActaStore: Send + Sync {
    /// Persist a new acta in `Draft` status and return its assigned id.
    async fn create_acta(&self, acta: NewActa) -> StorageResult<ActaId>;

    /// Get one acta by id.
    async fn get_acta(&self, id: &ActaId) -> StorageResult<Option<Acta>>;

    /// Apply a partial update, bumping the revision and `updated_at`.
    ///
    /// Fails with `Conflict` when `expected_revision` does not match the
    /// stored revision, `NotFound` when the acta does not exist.
    async fn update_acta(
        &self,
        id: &ActaId,
        update: ActaUpdate,
        expected_revision: u64,
    ) -> StorageResult<()>;

    /// List an organization's actas newest-first.
    async fn list_actas(
        &self,
        organization_id: &OrganizationId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Acta>>;

    /// Resolve a requester identity.
    async fn get_user(&self, id: &UserId) -> StorageResult<Option<UserProfile>>;

    /// Insert or replace a user profile.
    async fn upsert_user(&self, user: UserProfile) -> StorageResult<()>;
}
