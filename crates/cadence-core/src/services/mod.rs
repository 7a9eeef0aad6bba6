//! Services - the content pipeline built on top of the ports.

mod generator;
mod moderation;
mod pipeline;
mod scheduling;
mod usage;

pub use generator::{ContentGenerator, build_prompt, parse_completion, strip_code_fence};
pub use moderation::{DEFAULT_BANNED_TERMS, ModerationFilter};
pub use pipeline::PipelineOrchestrator;
pub use scheduling::{SchedulingEngine, SweepOutcome};
pub use usage::UsageMeter;
