//! Domain entities - the core business objects.

mod generation;
mod post;
mod profile;
mod usage;

pub use generation::{GeneratedPost, GenerationPolicy};
pub use post::{InvalidTransition, Post, PostStatus};
pub use profile::BrandProfile;
pub use usage::{UsageDelta, UsageRecord, month_start};
