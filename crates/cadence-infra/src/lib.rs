//! # Cadence Infrastructure
//!
//! Concrete implementations of the ports defined in `cadence-core`.
//! This crate contains the database, in-memory, identity and text generation
//! integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `auth` - JWT identity resolution
//! - `rate-limit` - Per-organization generation limits via governor
//! - `openai` - OpenAI-compatible text generation via reqwest

pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "openai")]
pub mod llm;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use memory::{InMemoryPostRepository, InMemoryProfileRepository, InMemoryUsageRepository};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConnections, PostgresPostRepository, PostgresProfileRepository,
    PostgresUsageRepository,
};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "openai")]
pub use llm::{OpenAiConfig, OpenAiTextGenerator};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{GenerationRateLimiter, RateLimitConfig};
