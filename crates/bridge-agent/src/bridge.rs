use std::sync::Arc;

use async_trait::async_trait;
use bridge_llm::{ChatProvider, Message, ToolSchema};
use bridge_mcp::ToolSession;
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::run::{AgentRun, ToolInvocation};
use crate::session_factory::{SessionFactory, SessionProfile};

/// Fixed system instruction binding the agent to the catalog tools. The
/// agent must relay the tool's literal output, not a rendition of it.
const SYSTEM_INSTRUCTION: &str =
    "You are an agent that uses tools to answer the user. \
     Just copy and paste the tool result to the user.";

/// Single-shot agent abstraction, so the interactive flow and tests can
/// stand in for the real bridge.
#[async_trait]
pub trait QueryAgent: Send + Sync {
    async fn query(&self, instruction: &str) -> Result<String>;
}

/// Binds the language model to the tools discovered through a fresh catalog
/// session and runs exactly one instruction. No state survives between
/// `query` calls; every call opens and releases its own session.
pub struct AgentBridge {
    provider: Arc<dyn ChatProvider>,
    sessions: Arc<dyn SessionFactory>,
    config: BridgeConfig,
}

impl AgentBridge {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        sessions: Arc<dyn SessionFactory>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            provider,
            sessions,
            config,
        }
    }

    /// Run one instruction with the standard session profile.
    pub async fn query_standard(&self, instruction: &str) -> Result<String> {
        self.query_with_profile(instruction, SessionProfile::Standard)
            .await
    }

    /// Run one instruction with the discovery profile (short timeouts, used
    /// by the fallback coordinator so a dead catalog is detected quickly).
    pub async fn query_discovery(&self, instruction: &str) -> Result<String> {
        self.query_with_profile(instruction, SessionProfile::Discovery)
            .await
    }

    async fn query_with_profile(
        &self,
        instruction: &str,
        profile: SessionProfile,
    ) -> Result<String> {
        // Credential check comes first: a missing key is a configuration
        // error and must surface before any session is opened.
        self.provider.ensure_ready()?;

        let session = self.sessions.open(profile).await?;
        self.run_with_session(session, instruction).await
    }

    /// Run the exchange over an already-open session. The session is
    /// released on every exit path; a close-time error that is not cleanup
    /// noise propagates.
    pub async fn run_with_session(
        &self,
        mut session: ToolSession,
        instruction: &str,
    ) -> Result<String> {
        let outcome = self.exchange(&mut session, instruction).await;
        session.close().await?;

        let run = outcome?;
        info!(
            "agent query finished ({} tool invocation(s))",
            run.tool_invocations.len()
        );
        Ok(run.final_text())
    }

    async fn exchange(&self, session: &mut ToolSession, instruction: &str) -> Result<AgentRun> {
        let tools: Vec<ToolSchema> = session
            .tools()
            .iter()
            .map(|t| ToolSchema::function(&t.name, &t.description, t.parameters.clone()))
            .collect();

        let mut messages = vec![
            Message::system(SYSTEM_INSTRUCTION),
            Message::user(instruction),
        ];
        let mut run = AgentRun::default();

        for round in 0..self.config.max_rounds {
            let completion = self
                .provider
                .chat(&messages, &tools, Some(&self.config.model))
                .await?;

            if !completion.has_tool_calls() {
                run.content = completion.content;
                break;
            }

            debug!(
                "round {}: model requested {} tool call(s)",
                round,
                completion.tool_calls.len()
            );
            messages.push(Message::assistant(
                completion.content.clone(),
                Some(completion.tool_calls.clone()),
            ));

            for call in &completion.tool_calls {
                let args: serde_json::Value = serde_json::from_str(&call.function.arguments)
                    .map_err(|e| {
                        BridgeError::Invocation(format!(
                            "model produced invalid arguments for '{}': {}",
                            call.function.name, e
                        ))
                    })?;

                let result = session.call_tool(&call.function.name, args).await?;
                let text = result.text();

                run.tool_invocations.push(ToolInvocation {
                    name: call.function.name.clone(),
                    raw_result: text.clone(),
                });
                messages.push(Message::tool_result(&call.id, text));
            }
        }

        Ok(run)
    }
}

#[async_trait]
impl QueryAgent for AgentBridge {
    async fn query(&self, instruction: &str) -> Result<String> {
        self.query_standard(instruction).await
    }
}
