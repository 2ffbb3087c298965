use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const GENERATION_EMPTY: &str = "Could not generate an answer";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Search provider error: {0}")]
    Search(String),

    #[error("Generation provider error: {0}")]
    GenerationProvider(String),

    #[error("Generation returned no candidates")]
    GenerationEmpty,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Status code and client-facing message. Only `BadRequest` and
    /// `GenerationProvider` carry their detail to the client.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED.to_string())
            }
            AppError::GenerationProvider(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::GenerationEmpty => {
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_EMPTY.to_string())
            }
            AppError::Search(_) | AppError::Transport(_) | AppError::ConfigError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        response::error(status, message).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Transport(format!("Malformed JSON: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
