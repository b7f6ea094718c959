use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::enums::InvitationStatus,
    db::models::api::error_codes,
    db::models::invitation::{
        MyInvitationInfo, NewProjectInvitation, ProjectInvitation, ProjectInvitationInfo,
    },
    db::models::member::NewProjectMember,
    db::models::notification::{NewNotification, kinds},
    db::models::project::Project,
    db::models::user::{User, UserSummary},
    db::repositories::{
        invitations::InvitationsRepo, members::MembersRepo, notifications::NotificationsRepo,
        projects::ProjectsRepo, users::UsersRepo,
    },
    error::{AppError, AppResult},
    services::{context::RequestContext, projects_service::ProjectsService},
    utils::AssetUrlHelper,
    validation::invitation::{check_invitee, invitee_email},
};

/// What the caller needs after an invite is stored: the row plus the parties for the email.
pub struct CreatedInvitation {
    pub invitation: ProjectInvitation,
    pub project: Project,
    pub inviter: User,
    pub invitee: User,
}

pub struct InvitationsService;

fn pending_exists_error() -> AppError {
    AppError::conflict_with_code(
        "There is already a pending invitation for this email",
        Some("email".to_string()),
        error_codes::INVITATION_PENDING_EXISTS,
    )
}

fn summaries(
    conn: &mut PgConnection,
    assets: &AssetUrlHelper,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, UserSummary>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(UsersRepo::find_many(conn, &ids)?
        .iter()
        .map(|u| (u.id, UserSummary::from_user(u, assets)))
        .collect())
}

impl InvitationsService {
    pub fn invite(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        project_id: Uuid,
        raw_email: &str,
    ) -> AppResult<CreatedInvitation> {
        let project = ProjectsService::require_owner(conn, project_id, ctx.user_id)?;
        let email = invitee_email(raw_email)?;

        let invitee = UsersRepo::find_by_email(conn, &email)?
            .ok_or_else(|| AppError::not_found("User with that email"))?;
        let already_member = MembersRepo::is_member(conn, project.id, invitee.id)?;
        check_invitee(ctx.user_id, project.owner_id, invitee.id, already_member)?;

        if InvitationsRepo::pending_exists(conn, project.id, &email)? {
            return Err(pending_exists_error());
        }

        let inviter = UsersRepo::find_by_id(conn, ctx.user_id)?
            .ok_or_else(|| AppError::auth("Not authorized, user not found"))?;

        let invitation = conn.transaction::<ProjectInvitation, AppError, _>(|tx| {
            let invitation = InvitationsRepo::insert(
                tx,
                &NewProjectInvitation {
                    project_id: project.id,
                    inviter_id: ctx.user_id,
                    invitee_user_id: Some(invitee.id),
                    invitee_email: email.clone(),
                    status: InvitationStatus::Pending,
                },
            )
            .map_err(|e| match AppError::from(e) {
                // lost a race against a concurrent invite
                AppError::Conflict { .. } => pending_exists_error(),
                other => other,
            })?;

            NotificationsRepo::insert(
                tx,
                &NewNotification::new(
                    invitee.id,
                    kinds::PROJECT_INVITE,
                    format!("Invitation to the project {}", project.name),
                )
                .with_body(format!("{} invited you to collaborate", inviter.name)),
            )?;
            Ok(invitation)
        })?;

        tracing::info!(
            invitation_id = %invitation.id,
            project_id = %project.id,
            invitee = %invitee.id,
            "Invitation created"
        );

        Ok(CreatedInvitation {
            invitation,
            project,
            inviter,
            invitee,
        })
    }

    pub fn list_mine(
        conn: &mut PgConnection,
        assets: &AssetUrlHelper,
        ctx: &RequestContext,
    ) -> AppResult<Vec<MyInvitationInfo>> {
        let rows = InvitationsRepo::list_pending_for_invitee(conn, ctx.user_id, &ctx.email)?;
        let inviters = summaries(conn, assets, rows.iter().map(|(inv, _)| inv.inviter_id))?;

        Ok(rows
            .into_iter()
            .map(|(inv, project)| MyInvitationInfo {
                id: inv.id,
                project_id: project.id,
                project_name: project.name,
                inviter: inviters.get(&inv.inviter_id).cloned(),
                status: inv.status,
                created_at: inv.created_at,
            })
            .collect())
    }

    /// Loads a pending invitation addressed to the caller: 404 when missing or
    /// already settled, 403 when addressed to someone else.
    fn load_pending_for_invitee(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invitation_id: Uuid,
    ) -> AppResult<ProjectInvitation> {
        let invitation = InvitationsRepo::find_by_id(conn, invitation_id)?
            .filter(|inv| inv.status == InvitationStatus::Pending)
            .ok_or_else(|| AppError::not_found("Invitation"))?;
        if !invitation.is_addressed_to(ctx.user_id, &ctx.email) {
            return Err(AppError::forbidden("This invitation is not addressed to you"));
        }
        Ok(invitation)
    }

    fn respond(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invitation_id: Uuid,
        next: InvitationStatus,
    ) -> AppResult<ProjectInvitation> {
        let invitation = Self::load_pending_for_invitee(conn, ctx, invitation_id)?;

        let settled = conn.transaction::<ProjectInvitation, AppError, _>(|tx| {
            let settled = InvitationsRepo::transition_from_pending(tx, invitation.id, next)?
                .ok_or_else(|| AppError::not_found("Invitation"))?;

            if next == InvitationStatus::Accepted {
                MembersRepo::insert_if_absent(
                    tx,
                    &NewProjectMember::member(settled.project_id, ctx.user_id),
                )?;
            }

            let project_name = ProjectsRepo::find_by_id(tx, settled.project_id)?
                .map(|p| p.name)
                .unwrap_or_default();
            let (kind, verb) = match next {
                InvitationStatus::Accepted => (kinds::INVITE_ACCEPTED, "accepted"),
                _ => (kinds::INVITE_DECLINED, "declined"),
            };
            NotificationsRepo::insert(
                tx,
                &NewNotification::new(
                    settled.inviter_id,
                    kind,
                    format!("{} {} your invitation to {}", ctx.email, verb, project_name),
                ),
            )?;
            Ok(settled)
        })?;

        tracing::info!(invitation_id = %settled.id, status = %next.as_str(), "Invitation settled");
        Ok(settled)
    }

    pub fn accept(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invitation_id: Uuid,
    ) -> AppResult<ProjectInvitation> {
        Self::respond(conn, ctx, invitation_id, InvitationStatus::Accepted)
    }

    pub fn decline(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invitation_id: Uuid,
    ) -> AppResult<ProjectInvitation> {
        Self::respond(conn, ctx, invitation_id, InvitationStatus::Declined)
    }

    pub fn cancel(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invitation_id: Uuid,
    ) -> AppResult<()> {
        let invitation = InvitationsRepo::find_by_id(conn, invitation_id)?
            .ok_or_else(|| AppError::not_found("Invitation"))?;
        let project = ProjectsService::require_owner(conn, invitation.project_id, ctx.user_id)?;

        conn.transaction::<(), AppError, _>(|tx| {
            let canceled =
                InvitationsRepo::transition_from_pending(tx, invitation.id, InvitationStatus::Canceled)?
                    .ok_or_else(|| AppError::not_found("Invitation"))?;
            if let Some(invitee_id) = canceled.invitee_user_id {
                NotificationsRepo::insert(
                    tx,
                    &NewNotification::new(
                        invitee_id,
                        kinds::INVITE_CANCELED,
                        format!("Your invitation to {} was canceled", project.name),
                    ),
                )?;
            }
            Ok(())
        })?;

        tracing::info!(invitation_id = %invitation.id, "Invitation canceled");
        Ok(())
    }

    pub fn list_for_project(
        conn: &mut PgConnection,
        assets: &AssetUrlHelper,
        ctx: &RequestContext,
        project_id: Uuid,
    ) -> AppResult<Vec<ProjectInvitationInfo>> {
        let project = ProjectsService::require_owner(conn, project_id, ctx.user_id)?;
        let pending = InvitationsRepo::list_pending_for_project(conn, project.id)?;
        let invitees = summaries(conn, assets, pending.iter().filter_map(|i| i.invitee_user_id))?;

        Ok(pending
            .into_iter()
            .map(|inv| ProjectInvitationInfo {
                id: inv.id,
                invitee: inv.invitee_user_id.and_then(|id| invitees.get(&id).cloned()),
                invitee_email: inv.invitee_email,
                status: inv.status,
                created_at: inv.created_at,
            })
            .collect())
    }
}
