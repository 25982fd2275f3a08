use bridge_llm::LlmError;
use bridge_mcp::McpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required credential or setting is missing. Fatal, surfaced
    /// immediately, never retried or recovered by fallback.
    #[error("configuration error: {0}")]
    Config(String),

    /// The tool catalog failed in a recognizable way (connect, timeout,
    /// protocol). The coordinator recovers these with a direct model call.
    #[error("tool catalog error: {0}")]
    Catalog(#[from] McpError),

    /// Any other failure while exchanging messages with the model or tool.
    /// Logged in full server-side; callers only ever see [`Self::Unavailable`].
    #[error("invocation failed: {0}")]
    Invocation(String),

    #[error("the optimization service is temporarily unavailable")]
    Unavailable,
}

impl From<LlmError> for BridgeError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey(var) => {
                BridgeError::Config(format!("environment variable '{}' is not set", var))
            }
            other => BridgeError::Invocation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
