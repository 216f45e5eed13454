//! HTTP layer.
//!
//! One route matters: `POST /api/ussd`, the gateway callback. A processed
//! round-trip always answers 200 with a well-formed envelope — the engine
//! folds its own failures into the response text — so the only client error
//! is an invalid envelope.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::ussd::service::DialogService;
use crate::ussd::session::SessionRequest;
use crate::ussd::UssdError;

#[derive(Clone)]
pub struct AppState {
    pub dialog: Arc<DialogService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ussd", post(process_ussd))
        .route("/api/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any)),
        )
        .with_state(state)
}

async fn process_ussd(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Response {
    match state.dialog.process(&req).await {
        Ok(res) => (StatusCode::OK, Json(res)).into_response(),
        Err(err @ UssdError::InvalidEnvelope(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "citypay" }))
}
