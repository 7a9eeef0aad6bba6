//! Generate → moderate → stagger → persist → meter.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::domain::{GenerationPolicy, Post, UsageDelta};
use crate::error::PipelineError;
use crate::ports::{BaseRepository, Clock, PostRepository, ProfileRepository};

use super::{ContentGenerator, ModerationFilter, UsageMeter};

/// Composes the pipeline services for one generation call.
///
/// A single generation attempt is made per call; retries belong to the caller.
pub struct PipelineOrchestrator {
    profiles: Arc<dyn ProfileRepository>,
    posts: Arc<dyn PostRepository>,
    generator: ContentGenerator,
    moderation: ModerationFilter,
    usage: Arc<UsageMeter>,
    policy: GenerationPolicy,
    clock: Arc<dyn Clock>,
}

impl PipelineOrchestrator {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        posts: Arc<dyn PostRepository>,
        generator: ContentGenerator,
        moderation: ModerationFilter,
        usage: Arc<UsageMeter>,
        policy: GenerationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            posts,
            generator,
            moderation,
            usage,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// Generate drafts for an organization and persist them.
    ///
    /// Draft `i` gets a provisional date of today + `i` days. If persisting
    /// fails the generated content is lost and must be regenerated.
    pub async fn generate_and_persist(
        &self,
        organization_id: Uuid,
        requested_count: Option<i64>,
    ) -> Result<Vec<Post>, PipelineError> {
        let profile = self
            .profiles
            .find_by_id(organization_id)
            .await?
            .ok_or(PipelineError::ProfileNotFound(organization_id))?;

        let count = self.policy.clamp(requested_count);
        let generated = self.generator.generate(&profile, count).await?;

        let now = self.clock.now();
        let drafts: Vec<Post> = generated
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let flagged = self.moderation.is_flagged(&item.text);
                if flagged {
                    tracing::info!(
                        organization_id = %organization_id,
                        index,
                        "Generated post flagged for review"
                    );
                }
                let scheduled_at = now + Duration::days(index as i64);
                Post::draft(organization_id, item, scheduled_at, flagged, now)
            })
            .collect();

        // Image rendering is not part of this pipeline, so no image is ever
        // produced from the prompts here.
        let delta = UsageDelta::from_texts(drafts.iter().map(|p| p.text.as_str()), 0);

        let posts = self.posts.insert_batch(drafts).await.map_err(|e| {
            tracing::error!(
                organization_id = %organization_id,
                error = %e,
                "Failed to persist generated posts"
            );
            PipelineError::Persistence(e)
        })?;

        self.usage.record(organization_id, delta).await?;

        tracing::info!(
            organization_id = %organization_id,
            requested = count,
            created = posts.len(),
            flagged = posts.iter().filter(|p| p.flagged).count(),
            "Drafts generated"
        );

        Ok(posts)
    }
}
