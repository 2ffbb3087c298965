use std::any::Any as PanicPayload;

use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::api::models::{ChatRequest, HealthResponse};
use crate::api::response;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler).fallback(method_not_allowed))
        .route("/api/health", get(health_handler))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match validate(payload) {
        Ok(message) => message,
        Err(err) => {
            warn!("Rejected chat request: {}", err);
            return err.into_response();
        }
    };

    info!(message_chars = message.chars().count(), "Processing chat request");
    let start_time = std::time::Instant::now();

    let result = state.relay.answer(&message).await;
    info!("Request processing took: {:?}", start_time.elapsed());

    match result {
        Ok(answer) => response::success(answer).into_response(),
        Err(err) => err.into_response(),
    }
}

fn validate(payload: Result<Json<ChatRequest>, JsonRejection>) -> crate::error::Result<String> {
    let Json(req) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    match req.message {
        Some(message) if !message.trim().is_empty() => Ok(message),
        _ => Err(AppError::BadRequest("Message is required".to_string())),
    }
}

/// Turns a handler panic into the generic 500 body so the caller still gets
/// exactly one response.
fn handle_panic(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Chat handler panicked: {}", detail);
    AppError::Transport(detail.to_string()).into_response()
}

async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
