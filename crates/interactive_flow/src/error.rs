use bridge_agent::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("session store error: {0}")]
    Store(String),

    #[error(transparent)]
    Agent(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, FlowError>;
