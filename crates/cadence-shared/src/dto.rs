//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to generate a batch of drafts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateDraftsRequest {
    /// Clamped server-side. Absent or non-positive means the default count.
    #[serde(default)]
    pub count: Option<i64>,
}

/// Request to schedule (or re-schedule) a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePostRequest {
    pub publish_at: DateTime<Utc>,
}

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    /// One of `draft`, `scheduled`, `published`.
    pub status: Option<String>,
}

/// Query string of `GET /usage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageQuery {
    /// Month as `YYYY-MM`. Defaults to the current month.
    pub month: Option<String>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub text: String,
    pub hashtags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Brand profile of the caller's organization. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfileDto {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub themes: Option<String>,
    #[serde(default)]
    pub channels: Option<String>,
}

/// Result of a publish-due call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishDueResponse {
    pub published: u64,
}

/// Monthly usage counters of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageResponse {
    pub organization_id: Uuid,
    /// First day of the month.
    pub month: NaiveDate,
    pub tokens_used: i64,
    pub images_generated: i64,
}
