use crate::AppState;
use crate::db::models::{
    AdminCreateUserRequest, AdminUpdateUserRequest, AdminUserInfo, ApiResponse, ResponseMeta,
};
use crate::error::AppResult;
use crate::middleware::auth::AuthUserInfo;
use crate::services::{AdminUsersService, RequestContext};
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_users(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let users = state.db_call(AdminUsersService::list).await?;

    let total = users.len() as i64;
    let users: Vec<AdminUserInfo> = users
        .iter()
        .map(|u| AdminUserInfo::from_user(u, &state.asset_helper))
        .collect();

    Ok(Json(ApiResponse::success_with_meta(
        users,
        "Users retrieved successfully",
        ResponseMeta {
            pagination: None,
            total_count: Some(total),
        },
    )))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .db_call(move |conn| AdminUsersService::get(conn, user_id))
        .await?;
    Ok(Json(ApiResponse::success(
        AdminUserInfo::from_user(&user, &state.asset_helper),
        "User retrieved successfully",
    )))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<AdminCreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let config = state.config.clone();
    let user = state
        .db_call(move |conn| AdminUsersService::create(conn, &ctx, &config, &payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            AdminUserInfo::from_user(&user, &state.asset_helper),
            "User created successfully",
        )),
    ))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminUpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let cost = state.config.bcrypt_cost;
    let user = state
        .db_call(move |conn| AdminUsersService::update(conn, &ctx, user_id, &payload, cost))
        .await?;
    state.user_cache.evict(user_id).await;

    Ok(Json(ApiResponse::success(
        AdminUserInfo::from_user(&user, &state.asset_helper),
        "User updated successfully",
    )))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let ctx = RequestContext::new(&auth_info, &headers);
    state
        .db_call(move |conn| AdminUsersService::delete(conn, &ctx, user_id))
        .await?;
    state.user_cache.evict(user_id).await;

    tracing::info!(actor = %auth_info.id(), user_id = %user_id, "Admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}
