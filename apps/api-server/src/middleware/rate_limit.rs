//! Per-organization generation rate limiting.

use cadence_core::ports::RateLimiter;
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};

/// Consume one generation from the organization's allowance.
///
/// Limiter backend errors fail open.
pub async fn enforce_generation_limit(
    limiter: Option<&dyn RateLimiter>,
    organization_id: Uuid,
) -> AppResult<()> {
    let Some(limiter) = limiter else {
        return Ok(());
    };

    match limiter.check(organization_id).await {
        Ok(result) if !result.allowed => {
            tracing::warn!(
                organization_id = %organization_id,
                retry_after_ms = result.retry_after.as_millis() as u64,
                "Generation rate limit exceeded"
            );
            Err(AppError::TooManyRequests {
                retry_after_secs: result.retry_after.as_secs().max(1),
            })
        }
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Rate limiter error, failing open");
            Ok(())
        }
    }
}
