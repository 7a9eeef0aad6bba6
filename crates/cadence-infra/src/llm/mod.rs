//! Text generation backends.

mod openai;

pub use openai::{OpenAiConfig, OpenAiTextGenerator};
