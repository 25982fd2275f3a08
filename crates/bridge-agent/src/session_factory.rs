use async_trait::async_trait;
use bridge_mcp::{McpError, SseConfig, ToolSession};

/// Timeout profile for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionProfile {
    /// 30s connect / 300s between events, for single-shot optimization queries
    Standard,
    /// 20s / 20s, for discovery-oriented calls where a dead catalog should be
    /// detected quickly so the caller can fall back
    Discovery,
}

/// Seam through which the bridge opens catalog sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, profile: SessionProfile) -> Result<ToolSession, McpError>;
}

/// Opens real SSE sessions against the configured catalog endpoint.
pub struct SseSessionFactory {
    catalog_url: String,
}

impl SseSessionFactory {
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
        }
    }
}

#[async_trait]
impl SessionFactory for SseSessionFactory {
    async fn open(&self, profile: SessionProfile) -> Result<ToolSession, McpError> {
        let config = match profile {
            SessionProfile::Standard => SseConfig::new(&self.catalog_url),
            SessionProfile::Discovery => SseConfig::discovery(&self.catalog_url),
        };
        ToolSession::open(config).await
    }
}
