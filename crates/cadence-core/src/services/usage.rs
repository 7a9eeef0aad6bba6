//! Per-organization monthly usage metering.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{UsageDelta, UsageRecord, month_start};
use crate::error::RepoError;
use crate::ports::{Clock, UsageRepository};

pub struct UsageMeter {
    repo: Arc<dyn UsageRepository>,
    clock: Arc<dyn Clock>,
}

impl UsageMeter {
    pub fn new(repo: Arc<dyn UsageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Add `delta` to the organization's record for the current month.
    pub async fn record(
        &self,
        organization_id: Uuid,
        delta: UsageDelta,
    ) -> Result<UsageRecord, RepoError> {
        let now = self.clock.now();
        let month = month_start(now.date_naive());
        let record = self.repo.increment(organization_id, month, delta, now).await?;

        tracing::debug!(
            organization_id = %organization_id,
            month = %month,
            tokens = delta.tokens,
            images = delta.images,
            tokens_total = record.tokens_used,
            "Usage recorded"
        );

        Ok(record)
    }

    /// Counters for `month` (default: the current month). Zero when unused.
    pub async fn usage(
        &self,
        organization_id: Uuid,
        month: Option<NaiveDate>,
    ) -> Result<UsageRecord, RepoError> {
        let month = month_start(month.unwrap_or_else(|| self.clock.now().date_naive()));
        Ok(self
            .repo
            .find(organization_id, month)
            .await?
            .unwrap_or_else(|| UsageRecord::empty(organization_id, month)))
    }
}
