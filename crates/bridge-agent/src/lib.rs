//! Tool-augmented query bridge.
//!
//! Binds the language model to the tools discovered through a short-lived
//! catalog session, runs exactly one instruction, extracts a deterministic
//! answer (raw tool output preferred over the model's paraphrase), and
//! guarantees the session is released on every exit path. The coordinator
//! wraps the bridge with a tool-less direct-call fallback.

pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod run;
pub mod session_factory;

pub use bridge::{AgentBridge, QueryAgent};
pub use config::BridgeConfig;
pub use coordinator::{Coordinator, PromptOptimizer};
pub use error::{BridgeError, Result};
pub use run::{AgentRun, ToolInvocation};
pub use session_factory::{SessionFactory, SessionProfile, SseSessionFactory};
