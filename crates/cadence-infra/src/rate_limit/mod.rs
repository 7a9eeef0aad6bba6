//! Rate limiting implementations.

mod memory;

pub use memory::{GenerationRateLimiter, RateLimitConfig};
