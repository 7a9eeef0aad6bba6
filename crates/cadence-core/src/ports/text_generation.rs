//! Text generation capability port.

use async_trait::async_trait;

use crate::error::GenerationError;

/// An external text-completion capability (an LLM behind an HTTP API).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send an instruction prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}
