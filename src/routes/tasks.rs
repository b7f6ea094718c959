use crate::AppState;
use crate::db::models::{ApiResponse, CreateTaskRequest, UpcomingTasksQuery, UpdateTaskStatusRequest};
use crate::error::AppResult;
use crate::middleware::auth::AuthUserInfo;
use crate::services::TasksService;
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub async fn get_tasks(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let assets = state.asset_helper.clone();
    let tasks = state
        .db_call(move |conn| TasksService::list(conn, &assets, user_id, project_id))
        .await?;
    Ok(Json(ApiResponse::success(tasks, "Tasks retrieved successfully")))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateTaskRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let task = state
        .db_call(move |conn| TasksService::create(conn, user_id, project_id, &payload, Utc::now()))
        .await?;

    tracing::info!(task_id = %task.id, project_id = %project_id, "Task created");
    state.webhooks.task_created(&task);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(task, "Task created successfully")),
    ))
}

pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let task = state
        .db_call(move |conn| {
            TasksService::update_status(conn, user_id, project_id, task_id, &payload.status)
        })
        .await?;
    Ok(Json(ApiResponse::success(task, "Task status updated")))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let user_id = auth_info.id();
    state
        .db_call(move |conn| TasksService::delete(conn, user_id, project_id, task_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_upcoming_tasks(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Query(params): Query<UpcomingTasksQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let assets = state.asset_helper.clone();
    let tasks = state
        .db_call(move |conn| TasksService::upcoming(conn, &assets, user_id, params.days, Utc::now()))
        .await?;
    Ok(Json(ApiResponse::success(
        tasks,
        "Upcoming tasks retrieved successfully",
    )))
}
