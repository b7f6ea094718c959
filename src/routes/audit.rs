use crate::AppState;
use crate::db::models::{ApiResponse, AuditLogQuery};
use crate::error::AppResult;
use crate::services::AuditService;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditLogQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = params.clamped_limit();
    let assets = state.asset_helper.clone();
    let logs = state
        .db_call(move |conn| AuditService::list(conn, &assets, limit))
        .await?;
    Ok(Json(ApiResponse::success(logs, "Audit logs retrieved successfully")))
}
