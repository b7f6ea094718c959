use crate::AppState;
use crate::db::models::{ApiResponse, UpdateSettingsRequest};
use crate::error::AppResult;
use crate::middleware::auth::AuthUserInfo;
use crate::services::SettingsService;
use crate::validation::ValidatedJson;
use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let settings = state
        .db_call(move |conn| SettingsService::get(conn, user_id))
        .await?;
    Ok(Json(ApiResponse::success(settings, "Settings retrieved")))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<UpdateSettingsRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let settings = state
        .db_call(move |conn| SettingsService::update(conn, user_id, &payload))
        .await?;
    state.user_cache.evict(user_id).await;
    Ok(Json(ApiResponse::success(settings, "Settings updated")))
}
