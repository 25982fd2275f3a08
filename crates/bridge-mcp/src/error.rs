use thiserror::Error;

/// Textual signatures of benign transport-teardown noise. Inherited from the
/// upstream streaming client, which reports cooperative-cancellation cleanup
/// through stringly errors; matching on substrings is fragile and only kept
/// as a fallback for noise that does not arrive as [`McpError::CleanupNoise`].
const CLEANUP_NOISE_MARKERS: &[&str] = &["cancel scope", "generator didn't stop after athrow"];

#[derive(Error, Debug, Clone)]
pub enum McpError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Session disconnected")]
    Disconnected,

    /// Teardown artifact of the streaming transport; carries no information
    /// about query success and is always swallowed at close time.
    #[error("Cleanup noise: {0}")]
    CleanupNoise(String),
}

impl McpError {
    /// Whether this error is benign close-time noise that must be discarded
    /// rather than surfaced.
    pub fn is_cleanup_noise(&self) -> bool {
        match self {
            McpError::CleanupNoise(_) => true,
            other => {
                let text = other.to_string();
                CLEANUP_NOISE_MARKERS
                    .iter()
                    .any(|marker| text.contains(marker))
            }
        }
    }
}

impl From<serde_json::Error> for McpError {
    fn from(e: serde_json::Error) -> Self {
        McpError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for McpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            McpError::Timeout(e.to_string())
        } else if e.is_connect() {
            McpError::Connection(e.to_string())
        } else {
            McpError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, McpError>;
