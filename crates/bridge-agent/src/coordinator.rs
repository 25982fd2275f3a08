use std::sync::Arc;

use async_trait::async_trait;
use bridge_llm::{ChatProvider, Message};
use tracing::{error, warn};

use crate::bridge::{AgentBridge, QueryAgent};
use crate::error::{BridgeError, Result};

/// Single-shot optimization seam for the HTTP layer.
#[async_trait]
pub trait PromptOptimizer: Send + Sync {
    async fn optimize(&self, instruction: &str) -> Result<String>;
}

/// Wraps the bridge with a tool-less direct-call fallback.
///
/// Tool-catalog failures are recovered locally; the caller cannot tell the
/// two paths apart from the returned text. Everything that is neither a
/// catalog failure nor a configuration error collapses to a generic
/// unavailability, with the detail kept in the server-side logs.
pub struct Coordinator {
    bridge: Arc<AgentBridge>,
    provider: Arc<dyn ChatProvider>,
    fallback_model: String,
}

impl Coordinator {
    pub fn new(
        bridge: Arc<AgentBridge>,
        provider: Arc<dyn ChatProvider>,
        fallback_model: impl Into<String>,
    ) -> Self {
        Self {
            bridge,
            provider,
            fallback_model: fallback_model.into(),
        }
    }

    /// Single-shot optimization used by the quick flow.
    pub async fn optimize(&self, instruction: &str) -> Result<String> {
        match self.bridge.query_discovery(instruction).await {
            Ok(answer) => Ok(answer),
            Err(BridgeError::Catalog(e)) => {
                warn!(
                    "tool catalog unavailable, falling back to direct model call: {}",
                    e
                );
                self.direct(instruction).await
            }
            Err(config @ BridgeError::Config(_)) => Err(config),
            Err(other) => {
                error!("optimization failed: {}", other);
                Err(BridgeError::Unavailable)
            }
        }
    }

    /// Tool-free rewrite: one plain model call, no system constraint
    /// requiring tool usage.
    async fn direct(&self, instruction: &str) -> Result<String> {
        self.provider.ensure_ready()?;

        match self
            .provider
            .chat(
                &[Message::user(instruction)],
                &[],
                Some(&self.fallback_model),
            )
            .await
        {
            Ok(completion) => Ok(completion.content),
            Err(e) => {
                error!("direct fallback call failed: {}", e);
                Err(BridgeError::Unavailable)
            }
        }
    }
}

#[async_trait]
impl PromptOptimizer for Coordinator {
    async fn optimize(&self, instruction: &str) -> Result<String> {
        Coordinator::optimize(self, instruction).await
    }
}

/// The interactive flow issues its round queries through the coordinator so
/// every round inherits the fallback and error classification.
#[async_trait]
impl QueryAgent for Coordinator {
    async fn query(&self, instruction: &str) -> Result<String> {
        Coordinator::optimize(self, instruction).await
    }
}
