//! Per-organization generation rate limiter using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use uuid::Uuid;

use cadence_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

type KeyedRateLimiter = GovernorRateLimiter<Uuid, DefaultKeyedStateStore<Uuid>, DefaultClock>;

/// Generation allowance per organization.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Generation calls allowed per minute (also the burst size).
    pub per_minute: NonZeroU32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        std::env::var("GENERATION_RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .and_then(NonZeroU32::new)
            .map(|per_minute| Self { per_minute })
            .unwrap_or_default()
    }
}

/// In-memory GCRA limiter keyed by organization.
///
/// Limits are per-process, not shared across instances.
pub struct GenerationRateLimiter {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
}

impl GenerationRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            limiter: GovernorRateLimiter::keyed(Quota::per_minute(config.per_minute)),
            clock: DefaultClock::default(),
        }
    }
}

#[async_trait]
impl RateLimiter for GenerationRateLimiter {
    async fn check(&self, organization_id: Uuid) -> Result<RateLimitResult, RateLimitError> {
        match self.limiter.check_key(&organization_id) {
            Ok(()) => Ok(RateLimitResult {
                allowed: true,
                retry_after: Duration::ZERO,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                retry_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}
