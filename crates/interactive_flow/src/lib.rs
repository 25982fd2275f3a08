//! Three-round interactive optimization flow.
//!
//! Round 1 collects answers to five fixed intake questions, round 2 has the
//! tool catalog produce up to three follow-up questions, round 3 synthesizes
//! the final optimized prompt from everything collected. Rounds arrive as
//! independent requests; the intake record is persisted between them in a
//! pluggable session store.

pub mod error;
pub mod extract;
pub mod flow;
pub mod questions;
pub mod store;

pub use error::{FlowError, Result};
pub use extract::extract_numbered;
pub use flow::InteractiveFlow;
pub use questions::INTAKE_QUESTIONS;
pub use store::{InMemorySessionStore, IntakeRecord, QaPair, SessionStore};
