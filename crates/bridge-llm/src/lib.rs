//! Language-model invocation interface for the prompt-optimizer bridge.
//!
//! Defines the chat message/tool types, the [`ChatProvider`] seam, and the
//! Groq provider speaking the OpenAI-compatible chat-completions API.

pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{ChatProvider, LlmError, Result};
pub use providers::GroqProvider;
pub use types::{
    ChatCompletion, FunctionCall, FunctionSchema, Message, Role, ToolCall, ToolSchema,
};
