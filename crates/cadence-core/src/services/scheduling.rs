//! Scheduling engine - post lifecycle after generation.
//!
//! Publication is a local status change. Both the scoped `publish_due` call and
//! the global sweep use the same conditional update, so a post raced by both is
//! published exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostStatus};
use crate::error::PipelineError;
use crate::ports::{Clock, PostRepository};

/// Result of one sweep tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Published(u64),
    /// A previous tick was still running.
    Skipped,
    Failed,
}

pub struct SchedulingEngine {
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
    sweeping: AtomicBool,
}

struct SweepGuard<'a>(&'a AtomicBool);

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SchedulingEngine {
    pub fn new(posts: Arc<dyn PostRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            clock,
            sweeping: AtomicBool::new(false),
        }
    }

    /// Schedule (or re-schedule) a post of the caller's organization.
    pub async fn schedule(
        &self,
        organization_id: Uuid,
        post_id: Uuid,
        publish_at: DateTime<Utc>,
    ) -> Result<Post, PipelineError> {
        let now = self.clock.now();
        let changed = self
            .posts
            .schedule(organization_id, post_id, publish_at, now)
            .await?;

        let post = self
            .posts
            .find_by_id(organization_id, post_id)
            .await?
            .ok_or(PipelineError::PostNotFound(post_id))?;

        if changed == 0 {
            post.status.transition(PostStatus::Scheduled)?;
        }

        tracing::info!(
            organization_id = %organization_id,
            post_id = %post_id,
            publish_at = %publish_at,
            "Post scheduled"
        );

        Ok(post)
    }

    /// Publish every due post of one organization. Returns how many flipped.
    pub async fn publish_due(&self, organization_id: Uuid) -> Result<u64, PipelineError> {
        let now = self.clock.now();
        let published = self.posts.publish_due(Some(organization_id), now).await?;

        tracing::info!(
            organization_id = %organization_id,
            published,
            "Published due posts"
        );

        Ok(published)
    }

    /// One tick of the global sweep. Never fails; errors are logged.
    pub async fn sweep(&self) -> SweepOutcome {
        if self
            .sweeping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Previous publish sweep still running, skipping tick");
            return SweepOutcome::Skipped;
        }
        let _guard = SweepGuard(&self.sweeping);

        let now = self.clock.now();
        match self.posts.publish_due(None, now).await {
            Ok(0) => {
                tracing::debug!("Publish sweep found no due posts");
                SweepOutcome::Published(0)
            }
            Ok(published) => {
                tracing::info!(published, "Publish sweep completed");
                SweepOutcome::Published(published)
            }
            Err(e) => {
                tracing::error!(error = %e, "Publish sweep failed");
                SweepOutcome::Failed
            }
        }
    }

    pub async fn post(&self, organization_id: Uuid, post_id: Uuid) -> Result<Post, PipelineError> {
        self.posts
            .find_by_id(organization_id, post_id)
            .await?
            .ok_or(PipelineError::PostNotFound(post_id))
    }

    pub async fn posts(
        &self,
        organization_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, PipelineError> {
        Ok(self.posts.list(organization_id, status).await?)
    }
}
