use crate::AppState;
use crate::db::models::ApiResponse;
use crate::error::AppResult;
use crate::middleware::auth::AuthUserInfo;
use crate::services::NotificationsService;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let notifications = state
        .db_call(move |conn| NotificationsService::list(conn, user_id))
        .await?;
    Ok(Json(ApiResponse::success(
        notifications,
        "Notifications retrieved successfully",
    )))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(notification_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let notification = state
        .db_call(move |conn| NotificationsService::mark_read(conn, user_id, notification_id))
        .await?;
    Ok(Json(ApiResponse::success(notification, "Notification marked as read")))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let marked = state
        .db_call(move |conn| NotificationsService::mark_all_read(conn, user_id))
        .await?;
    Ok(Json(ApiResponse::success(marked, "Notifications marked as read")))
}

pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let count = state
        .db_call(move |conn| NotificationsService::unread_count(conn, user_id))
        .await?;
    Ok(Json(ApiResponse::success(count, "Unread count retrieved")))
}
