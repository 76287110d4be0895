//! HTTP request handlers

use super::assets::{serve_asset, serve_index};
use super::types::{ChatRequest, ChatResponse, ErrorResponse};
use super::{cors_layer, AppState};
use crate::runtime::RelayError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Browser client
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_asset))
        // Chat relay; every other method is rejected with a JSON error
        .route("/api/chat", post(send_chat).fallback(method_not_allowed))
        // Version
        .route("/version", get(get_version))
        .layer(cors_layer())
        .with_state(state)
}

// ============================================================
// Chat Relay
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Credentials are checked before anything else about the request
    let relay = state.relay()?;

    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected chat request body");
        AppError::Internal(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let reply = relay
        .handle(request.user_message.as_deref(), request.thread_id.as_deref())
        .await?;

    Ok(Json(ChatResponse {
        result: reply.result,
        thread_id: reply.thread_id,
    }))
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("assistant-relay ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    MethodNotAllowed(Method),
    Internal(String),
}

impl From<RelayError> for AppError {
    fn from(error: RelayError) -> Self {
        match &error {
            RelayError::Unexpected(detail) => {
                tracing::error!(detail = %detail, "Chat relay failed unexpectedly");
            }
            other => tracing::warn!(error = %other, "Chat relay failed"),
        }
        AppError::Internal(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method {method} Not Allowed"),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
