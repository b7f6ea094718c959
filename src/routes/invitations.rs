use crate::AppState;
use crate::clients::mailer::project_invite_email;
use crate::db::models::{ApiResponse, InvitationCreated, InviteRequest};
use crate::error::AppResult;
use crate::middleware::auth::AuthUserInfo;
use crate::services::{InvitationsService, RequestContext};
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn invite_to_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<InviteRequest>,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let created = state
        .db_call(move |conn| InvitationsService::invite(conn, &ctx, project_id, &payload.email))
        .await?;

    tracing::info!(
        invitation_id = %created.invitation.id,
        project_id = %project_id,
        "Project invitation created"
    );

    let email = project_invite_email(
        &created.invitee.email,
        &created.project.name,
        &created.inviter.name,
    );
    let mailer = state.mailer.clone();
    tokio::spawn(async move { mailer.send_best_effort(email).await });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            InvitationCreated {
                ok: true,
                invitation_id: created.invitation.id,
            },
            "Invitation sent",
        )),
    ))
}

pub async fn get_my_invitations(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let assets = state.asset_helper.clone();
    let invitations = state
        .db_call(move |conn| InvitationsService::list_mine(conn, &assets, &ctx))
        .await?;
    Ok(Json(ApiResponse::success(
        invitations,
        "Invitations retrieved successfully",
    )))
}

pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(invitation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let invitation = state
        .db_call(move |conn| InvitationsService::accept(conn, &ctx, invitation_id))
        .await?;

    tracing::info!(invitation_id = %invitation.id, project_id = %invitation.project_id, "Invitation accepted");
    Ok(Json(ApiResponse::success(invitation, "Invitation accepted")))
}

pub async fn decline_invitation(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(invitation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let invitation = state
        .db_call(move |conn| InvitationsService::decline(conn, &ctx, invitation_id))
        .await?;
    Ok(Json(ApiResponse::success(invitation, "Invitation declined")))
}

pub async fn cancel_invitation(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(invitation_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let ctx = RequestContext::new(&auth_info, &headers);
    state
        .db_call(move |conn| InvitationsService::cancel(conn, &ctx, invitation_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_project_invitations(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let ctx = RequestContext::new(&auth_info, &headers);
    let assets = state.asset_helper.clone();
    let invitations = state
        .db_call(move |conn| InvitationsService::list_for_project(conn, &assets, &ctx, project_id))
        .await?;
    Ok(Json(ApiResponse::success(
        invitations,
        "Project invitations retrieved successfully",
    )))
}
