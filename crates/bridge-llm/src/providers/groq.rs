use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::{ChatProvider, LlmError, Result};
use crate::types::{ChatCompletion, Message, Role, ToolCall, ToolSchema};

pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "qwen/qwen3-32b";

/// Groq chat-completions provider (OpenAI-compatible API).
pub struct GroqProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from the process environment. The key is only *checked* at call
    /// time, so construction never fails; `ensure_ready` reports the missing
    /// credential before any request is attempted.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var(GROQ_API_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(GROQ_API_KEY_ENV))
    }
}

/// Build the OpenAI-compatible request body without leaking anything beyond
/// the wire fields.
fn build_chat_body(model: &str, messages: &[Message], tools: &[ToolSchema]) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Tool => "tool",
            };

            let mut msg = json!({
                "role": role,
                "content": m.content,
            });

            if let Some(tool_call_id) = &m.tool_call_id {
                msg["tool_call_id"] = json!(tool_call_id);
            }

            if let Some(tool_calls) = &m.tool_calls {
                msg["tool_calls"] = json!(tool_calls);
            }

            msg
        })
        .collect();

    let mut body = json!({
        "model": model,
        "messages": messages,
        "stream": false,
    });

    if !tools.is_empty() {
        body["tools"] = json!(tools);
        body["tool_choice"] = json!("auto");
    }

    body
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[async_trait]
impl ChatProvider for GroqProvider {
    fn ensure_ready(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        model: Option<&str>,
    ) -> Result<ChatCompletion> {
        let api_key = self.api_key()?;
        let model = model.unwrap_or(&self.model);
        let body = build_chat_body(model, messages, tools);

        debug!("chat request to {} with model {}", self.base_url, model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(LlmError::Api(format!("HTTP {}: {}", status, text)));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(LlmError::Api("response carried no choices".to_string()));
        };

        Ok(ChatCompletion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }
}
