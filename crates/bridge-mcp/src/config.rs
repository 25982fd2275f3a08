use serde::{Deserialize, Serialize};

/// SSE endpoint of the hosted prompt-optimizer tool catalog.
pub const DEFAULT_CATALOG_URL: &str =
    "https://augustosouza-prompt-optimizer-mcp-server.hf.space/gradio_api/mcp/sse";

/// SSE transport configuration for one tool session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// SSE endpoint URL
    pub url: String,
    /// Additional headers (auth, etc.)
    #[serde(default)]
    pub headers: Vec<HeaderConfig>,
    /// Seconds allowed to establish the connection
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Seconds of silence between SSE events before the connection is
    /// considered dead
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    300
}

impl SseConfig {
    /// Standard profile for single-shot optimization queries: 30s connect,
    /// 300s between events.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }

    /// Discovery-tuned profile: both timeouts at 20s, so a dead catalog is
    /// detected quickly and the caller can fall back.
    pub fn discovery(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            connect_timeout_secs: 20,
            read_timeout_secs: 20,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderConfig {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// HTTP header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub name: String,
    pub value: String,
}
