//! HTTP surface of the prompt-optimizer bridge.

pub mod controllers;
pub mod error;
pub mod server;

pub use error::{AppError, Result};
pub use server::{app_config, build_state, run, AppState};
