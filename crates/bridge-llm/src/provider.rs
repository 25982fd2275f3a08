use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ChatCompletion, Message, ToolSchema};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("environment variable '{0}' is not set")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Verify the provider is usable. Must fail without touching the
    /// network, so that a missing credential surfaces before any session
    /// or connection is opened.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// One non-streaming request/response cycle.
    ///
    /// # Arguments
    /// * `messages` - Chat messages
    /// * `tools` - Tools offered to the model (empty = tool-free call)
    /// * `model` - Optional model override. If None, uses the provider's default model
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        model: Option<&str>,
    ) -> Result<ChatCompletion>;
}
