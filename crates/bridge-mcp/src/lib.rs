//! MCP (Model Context Protocol) client for the prompt-optimizer tool catalog.
//!
//! This crate provides the short-lived tool session used by the agent bridge:
//! connect to the catalog's SSE endpoint, discover its tools, call them, and
//! tear the connection down again. Sessions are created per query and never
//! pooled.

pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transports;
pub mod types;

pub use config::{HeaderConfig, SseConfig, DEFAULT_CATALOG_URL};
pub use error::{McpError, Result};
pub use session::{McpTransport, ToolSession};
pub use transports::SseTransport;
pub use types::{McpCallResult, McpContentItem, McpTool};
