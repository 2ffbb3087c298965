use axum::Json;
use axum::http::StatusCode;

use crate::api::models::{ChatResponse, ErrorResponse};

pub fn success(answer: String) -> (StatusCode, Json<ChatResponse>) {
    (StatusCode::OK, Json(ChatResponse { answer }))
}

pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: message }))
}
