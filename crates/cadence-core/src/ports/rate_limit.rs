//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// Rate limiter trait - bounds how often an organization may request generation.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consume one unit of the organization's allowance.
    async fn check(&self, organization_id: Uuid) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub retry_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
