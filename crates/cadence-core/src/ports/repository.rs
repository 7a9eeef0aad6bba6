use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{BrandProfile, Post, PostStatus, UsageDelta, UsageRecord};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Brand profiles, keyed by organization id.
#[async_trait]
pub trait ProfileRepository: BaseRepository<BrandProfile, Uuid> {}

/// Post store. Every read and write is scoped to one organization, except the
/// global publish sweep.
///
/// Status changes are single conditional updates keyed on the current status,
/// so concurrent callers never double-apply a transition.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert all posts or none.
    async fn insert_batch(&self, posts: Vec<Post>) -> Result<Vec<Post>, RepoError>;

    async fn find_by_id(&self, organization_id: Uuid, id: Uuid)
    -> Result<Option<Post>, RepoError>;

    /// Posts of an organization ordered by scheduled time, then creation time.
    async fn list(
        &self,
        organization_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, RepoError>;

    /// Set `scheduled` + `publish_at` if the post is in a schedulable status.
    /// Returns the number of rows changed (0 or 1).
    async fn schedule(
        &self,
        organization_id: Uuid,
        id: Uuid,
        publish_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError>;

    /// Flip every `scheduled` post with `scheduled_at <= now` to `published`.
    /// `None` sweeps all organizations. Returns the number published.
    async fn publish_due(
        &self,
        organization_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError>;
}

/// Monthly usage counters.
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Additive upsert on (organization, month). Returns the updated record.
    async fn increment(
        &self,
        organization_id: Uuid,
        month: NaiveDate,
        delta: UsageDelta,
        now: DateTime<Utc>,
    ) -> Result<UsageRecord, RepoError>;

    async fn find(
        &self,
        organization_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<UsageRecord>, RepoError>;
}
