use crate::AppState;
use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Ready once a database connection can be checked out.
pub async fn readyz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.db_call(|_conn| Ok(())).await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
        }
    }
}
