use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use bridge_agent::BridgeError;
use interactive_flow::FlowError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing '{0}' field")]
    MissingField(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Service is not configured: {0}")]
    Configuration(String),

    #[error("The optimization service is temporarily unavailable. Please try again later.")]
    Unavailable,

    #[error("Internal server error")]
    Internal,
}

impl From<BridgeError> for AppError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::Config(message) => AppError::Configuration(message),
            // Catalog errors are absorbed by the coordinator's fallback; one
            // reaching this layer is treated like any other failure, and the
            // detail stays in the logs.
            other => {
                log::error!("bridge failure: {}", other);
                AppError::Unavailable
            }
        }
    }
}

impl From<FlowError> for AppError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::InvalidSubmission(message) => AppError::BadRequest(message),
            FlowError::Agent(inner) => inner.into(),
            FlowError::Store(message) => {
                log::error!("session store failure: {}", message);
                AppError::Internal
            }
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_type = match self {
            AppError::MissingField(_) | AppError::BadRequest(_) => "invalid_request",
            AppError::Configuration(_) => "configuration_error",
            AppError::Unavailable => "unavailable",
            AppError::Internal => "api_error",
        };
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: error_type.to_string(),
            },
        };
        HttpResponse::build(self.status_code()).json(error_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_llm::LlmError;

    #[test]
    fn unexpected_bridge_errors_are_not_echoed() {
        let err: AppError =
            BridgeError::Invocation("HTTP 500: secret internal detail".to_string()).into();
        assert!(matches!(err, AppError::Unavailable));
        assert!(!err.to_string().contains("secret internal detail"));
    }

    #[test]
    fn configuration_errors_keep_their_class() {
        let err: AppError = BridgeError::from(LlmError::MissingApiKey("GROQ_API_KEY")).into();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_submissions_are_bad_requests() {
        let err: AppError =
            FlowError::InvalidSubmission("expected 5 intake answers, got 1".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
