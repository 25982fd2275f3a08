use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SseConfig;
use crate::error::{McpError, Result};
use crate::protocol::models::{
    Implementation, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, McpInitializeRequest,
    McpInitializeResult, McpToolCallRequest, McpToolCallResult, McpToolListResult,
};
use crate::transports::SseTransport;
use crate::types::{McpCallResult, McpTool};

/// Transport seam for MCP communication
#[async_trait]
pub trait McpTransport: Send + Sync {
    async fn connect(&mut self) -> Result<()>;
    async fn disconnect(&mut self) -> Result<()>;
    async fn send(&self, message: String) -> Result<()>;
    async fn receive(&self) -> Result<Option<String>>;
    fn is_connected(&self) -> bool;
}

/// One open connection to the remote tool catalog.
///
/// A session is created per query and torn down at the end of that query's
/// scope; it is never shared or pooled. Requests are sequential, a single
/// request is in flight at a time, so correlation is a plain id check on the
/// receive loop.
pub struct ToolSession {
    transport: Box<dyn McpTransport>,
    tools: Vec<McpTool>,
    server_info: Option<Implementation>,
    request_timeout: Duration,
    next_id: u64,
}

impl std::fmt::Debug for ToolSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSession")
            .field("tools", &self.tools)
            .field("server_info", &self.server_info)
            .field("request_timeout", &self.request_timeout)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl ToolSession {
    /// Connect to the catalog over SSE and run the discovery handshake.
    pub async fn open(config: SseConfig) -> Result<Self> {
        let request_timeout = Duration::from_secs(config.read_timeout_secs);
        let transport = Box::new(SseTransport::new(config));
        Self::open_with_transport(transport, request_timeout).await
    }

    /// Open over an arbitrary transport: connect, `initialize`,
    /// `notifications/initialized`, then `tools/list`. If any step past
    /// construction fails the transport is released before the error is
    /// surfaced, so the caller never holds a half-open session.
    pub async fn open_with_transport(
        transport: Box<dyn McpTransport>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let mut session = Self {
            transport,
            tools: Vec::new(),
            server_info: None,
            request_timeout,
            next_id: 1,
        };

        if let Err(e) = session.establish().await {
            if let Err(close_err) = session.release().await {
                warn!("failed to release session after open error: {}", close_err);
            }
            return Err(e);
        }

        Ok(session)
    }

    async fn establish(&mut self) -> Result<()> {
        self.transport.connect().await?;

        let init = McpInitializeRequest::default();
        let response = self
            .send_request("initialize", Some(serde_json::to_value(&init)?))
            .await?;
        let result: McpInitializeResult = serde_json::from_value(
            response
                .result
                .ok_or_else(|| McpError::Protocol("Missing initialize result".to_string()))?,
        )?;
        info!(
            "connected to tool catalog: {} v{}",
            result.server_info.name, result.server_info.version
        );
        self.server_info = Some(result.server_info);

        let initialized = JsonRpcNotification {
            jsonrpc: "2.0".to_string(),
            method: "notifications/initialized".to_string(),
            params: None,
        };
        self.transport
            .send(serde_json::to_string(&initialized)?)
            .await?;

        let response = self.send_request("tools/list", None).await?;
        let result: McpToolListResult = serde_json::from_value(
            response
                .result
                .ok_or_else(|| McpError::Protocol("Missing tools/list result".to_string()))?,
        )?;
        self.tools = result
            .tools
            .into_iter()
            .map(|t| McpTool {
                name: t.name,
                description: t.description,
                parameters: t.input_schema.unwrap_or_else(|| serde_json::json!({})),
            })
            .collect();
        info!("tool catalog exposes {} tools", self.tools.len());

        Ok(())
    }

    /// Tools discovered during the handshake.
    pub fn tools(&self) -> &[McpTool] {
        &self.tools
    }

    pub fn server_info(&self) -> Option<&Implementation> {
        self.server_info.as_ref()
    }

    /// Invoke a catalog tool and return its result.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<McpCallResult> {
        if !self.tools.iter().any(|t| t.name == name) {
            return Err(McpError::ToolNotFound(name.to_string()));
        }

        let request = McpToolCallRequest {
            name: name.to_string(),
            arguments: Some(arguments),
        };
        let response = self
            .send_request("tools/call", Some(serde_json::to_value(&request)?))
            .await?;
        let result: McpToolCallResult = serde_json::from_value(
            response
                .result
                .ok_or_else(|| McpError::Protocol("Missing tools/call result".to_string()))?,
        )?;

        Ok(McpCallResult {
            content: result.content,
            is_error: result.is_error,
        })
    }

    /// Release the session. Close-time cleanup noise from the transport is
    /// discarded; any other close-time error propagates.
    pub async fn close(mut self) -> Result<()> {
        self.release().await
    }

    async fn release(&mut self) -> Result<()> {
        match self.transport.disconnect().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cleanup_noise() => {
                debug!("ignoring transport cleanup noise at close: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn send_request(&mut self, method: &str, params: Option<Value>) -> Result<JsonRpcResponse> {
        let id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest::new(id, method, params);
        self.transport.send(serde_json::to_string(&request)?).await?;

        let deadline = Instant::now() + self.request_timeout;
        loop {
            if Instant::now() >= deadline {
                return Err(McpError::Timeout(format!(
                    "request {} ({}) timed out after {}s",
                    id,
                    method,
                    self.request_timeout.as_secs()
                )));
            }

            match self.transport.receive().await? {
                Some(message) => {
                    if let Ok(response) = serde_json::from_str::<JsonRpcResponse>(&message) {
                        if response.id == id {
                            if let Some(error) = response.error {
                                return Err(McpError::Protocol(format!(
                                    "{}: {}",
                                    error.code, error.message
                                )));
                            }
                            return Ok(response);
                        }
                        debug!("dropping response for stale request {}", response.id);
                    } else if let Ok(notification) =
                        serde_json::from_str::<JsonRpcNotification>(&message)
                    {
                        debug!("server notification: {}", notification.method);
                    } else {
                        warn!("unparseable message from catalog: {}", message);
                    }
                }
                // Transport polls with its own short timeout; keep waiting
                // until the request deadline.
                None => {}
            }
        }
    }
}
