use crate::AppState;
use crate::db::models::{
    AddResourceLinkRequest, ApiResponse, CreateProjectRequest, SetWorkLinkRequest,
    UpdateProjectRequest,
};
use crate::error::AppResult;
use crate::middleware::auth::AuthUserInfo;
use crate::services::ProjectsService;
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn get_projects(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let projects = state
        .db_call(move |conn| ProjectsService::list(conn, user_id))
        .await?;
    Ok(Json(ApiResponse::success(
        projects,
        "Projects retrieved successfully",
    )))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<CreateProjectRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let project = state
        .db_call(move |conn| ProjectsService::create(conn, user_id, &payload))
        .await?;

    tracing::info!(project_id = %project.id, owner_id = %user_id, "Project created");
    state.webhooks.project_created(&project);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(project, "Project created successfully")),
    ))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let (project, _) = state
        .db_call(move |conn| ProjectsService::require_visible(conn, project_id, user_id))
        .await?;
    Ok(Json(ApiResponse::success(
        project,
        "Project retrieved successfully",
    )))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let project = state
        .db_call(move |conn| ProjectsService::update(conn, user_id, project_id, &payload))
        .await?;
    Ok(Json(ApiResponse::success(
        project,
        "Project updated successfully",
    )))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let user_id = auth_info.id();
    state
        .db_call(move |conn| ProjectsService::delete(conn, user_id, project_id))
        .await?;

    tracing::info!(project_id = %project_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_project_stats(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let stats = state
        .db_call(move |conn| ProjectsService::stats(conn, user_id, project_id))
        .await?;
    Ok(Json(ApiResponse::success(stats, "Project stats retrieved")))
}

pub async fn get_project_members(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let assets = state.asset_helper.clone();
    let members = state
        .db_call(move |conn| ProjectsService::members(conn, &assets, user_id, project_id))
        .await?;
    Ok(Json(ApiResponse::success(
        members,
        "Project members retrieved successfully",
    )))
}

pub async fn remove_project_member(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let user_id = auth_info.id();
    state
        .db_call(move |conn| ProjectsService::remove_member(conn, user_id, project_id, member_id))
        .await?;

    tracing::info!(project_id = %project_id, member_id = %member_id, "Project member removed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_work_link(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let link = state
        .db_call(move |conn| ProjectsService::work_link(conn, user_id, project_id))
        .await?;
    Ok(Json(ApiResponse::success(link, "Work link retrieved")))
}

pub async fn set_work_link(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SetWorkLinkRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let link = state
        .db_call(move |conn| ProjectsService::set_work_link(conn, user_id, project_id, &payload))
        .await?;
    Ok(Json(ApiResponse::success(link, "Work link saved")))
}

pub async fn get_links(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let links = state
        .db_call(move |conn| ProjectsService::links(conn, user_id, project_id))
        .await?;
    Ok(Json(ApiResponse::success(links, "Links retrieved successfully")))
}

pub async fn add_link(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddResourceLinkRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth_info.id();
    let link = state
        .db_call(move |conn| ProjectsService::add_link(conn, user_id, project_id, &payload))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(link, "Link added successfully")),
    ))
}

pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path((project_id, link_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let user_id = auth_info.id();
    state
        .db_call(move |conn| ProjectsService::delete_link(conn, user_id, project_id, link_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
