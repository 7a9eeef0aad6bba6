use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use cadence_core::domain::{UsageDelta, UsageRecord};
use cadence_core::error::RepoError;
use cadence_core::ports::UsageRepository;

/// In-memory usage counters keyed by (organization, month).
#[derive(Default)]
pub struct InMemoryUsageRepository {
    store: RwLock<HashMap<(Uuid, NaiveDate), UsageRecord>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn increment(
        &self,
        organization_id: Uuid,
        month: NaiveDate,
        delta: UsageDelta,
        now: DateTime<Utc>,
    ) -> Result<UsageRecord, RepoError> {
        let mut store = self.store.write().await;
        let record = store
            .entry((organization_id, month))
            .or_insert_with(|| UsageRecord::empty(organization_id, month));
        record.apply(delta, now);
        Ok(record.clone())
    }

    async fn find(
        &self,
        organization_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<UsageRecord>, RepoError> {
        Ok(self.store.read().await.get(&(organization_id, month)).cloned())
    }
}
