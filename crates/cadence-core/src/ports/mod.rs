//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod rate_limit;
mod repository;
mod text_generation;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, PostRepository, ProfileRepository, UsageRepository,
};
pub use text_generation::TextGenerator;
