use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GeneratedPost;

/// Lifecycle state of a post.
///
/// Posts only ever move forward: `draft -> scheduled -> published`.
/// A scheduled post may be re-scheduled; a published post is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }

    /// Validate a move from `self` to `to`, returning the new status.
    pub fn transition(self, to: PostStatus) -> Result<PostStatus, InvalidTransition> {
        match (self, to) {
            (PostStatus::Draft, PostStatus::Scheduled)
            | (PostStatus::Scheduled, PostStatus::Scheduled)
            | (PostStatus::Scheduled, PostStatus::Published) => Ok(to),
            (from, to) => Err(InvalidTransition { from, to }),
        }
    }

    /// Statuses from which a scheduling call is accepted.
    pub fn schedulable() -> [PostStatus; 2] {
        [PostStatus::Draft, PostStatus::Scheduled]
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot move post from {from} to {to}")]
pub struct InvalidTransition {
    pub from: PostStatus,
    pub to: PostStatus,
}

/// Post entity - one social-media content item owned by an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub text: String,
    pub hashtags: Vec<String>,
    /// Prompt the generator proposed for an accompanying image.
    pub image_prompt: Option<String>,
    /// Reference to a rendered image, once one exists.
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Advisory moderation marker; flagged posts still persist.
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a draft from generator output with a provisional publication date.
    pub fn draft(
        organization_id: Uuid,
        generated: GeneratedPost,
        scheduled_at: DateTime<Utc>,
        flagged: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            text: generated.text,
            hashtags: generated.hashtags,
            image_prompt: generated.image_prompt,
            image_url: None,
            status: PostStatus::Draft,
            scheduled_at: Some(scheduled_at),
            flagged,
            created_at: now,
            updated_at: now,
        }
    }

    /// Scheduled and at or past its publication time.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled && self.scheduled_at.is_some_and(|at| at <= now)
    }

    /// Move to `scheduled` with the given publication time.
    pub fn schedule(
        &mut self,
        publish_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.status = self.status.transition(PostStatus::Scheduled)?;
        self.scheduled_at = Some(publish_at);
        self.updated_at = now;
        Ok(())
    }

    /// Move to `published`. Only valid once the post is due.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        if !self.is_due(now) {
            return Err(InvalidTransition {
                from: self.status,
                to: PostStatus::Published,
            });
        }
        self.status = self.status.transition(PostStatus::Published)?;
        self.updated_at = now;
        Ok(())
    }
}
