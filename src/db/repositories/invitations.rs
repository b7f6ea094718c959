use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::InvitationStatus;
use crate::db::models::invitation::{NewProjectInvitation, ProjectInvitation};
use crate::db::models::project::Project;
use crate::schema::{project_invitations, projects};

pub struct InvitationsRepo;

impl InvitationsRepo {
    pub fn insert(
        conn: &mut PgConnection,
        new_inv: &NewProjectInvitation,
    ) -> QueryResult<ProjectInvitation> {
        diesel::insert_into(project_invitations::table)
            .values(new_inv)
            .returning(ProjectInvitation::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        invitation_id: Uuid,
    ) -> QueryResult<Option<ProjectInvitation>> {
        project_invitations::table
            .find(invitation_id)
            .select(ProjectInvitation::as_select())
            .first(conn)
            .optional()
    }

    pub fn pending_exists(
        conn: &mut PgConnection,
        project_id: Uuid,
        email: &str,
    ) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(
            project_invitations::table
                .filter(project_invitations::project_id.eq(project_id))
                .filter(project_invitations::invitee_email.eq(email))
                .filter(project_invitations::status.eq(InvitationStatus::Pending)),
        ))
        .get_result(conn)
    }

    /// Moves a pending invitation to `next`. The update only matches rows that
    /// are still pending, so of two racing transitions exactly one gets a row back.
    pub fn transition_from_pending(
        conn: &mut PgConnection,
        invitation_id: Uuid,
        next: InvitationStatus,
    ) -> QueryResult<Option<ProjectInvitation>> {
        diesel::update(
            project_invitations::table
                .filter(project_invitations::id.eq(invitation_id))
                .filter(project_invitations::status.eq(InvitationStatus::Pending)),
        )
        .set((
            project_invitations::status.eq(next),
            project_invitations::updated_at.eq(Utc::now()),
        ))
        .returning(ProjectInvitation::as_returning())
        .get_result(conn)
        .optional()
    }

    pub fn list_pending_for_invitee(
        conn: &mut PgConnection,
        user_id: Uuid,
        email: &str,
    ) -> QueryResult<Vec<(ProjectInvitation, Project)>> {
        project_invitations::table
            .inner_join(projects::table)
            .filter(project_invitations::status.eq(InvitationStatus::Pending))
            .filter(
                project_invitations::invitee_user_id
                    .eq(user_id)
                    .or(project_invitations::invitee_email.eq(email).nullable()),
            )
            .order(project_invitations::created_at.desc())
            .select((ProjectInvitation::as_select(), Project::as_select()))
            .load(conn)
    }

    pub fn list_pending_for_project(
        conn: &mut PgConnection,
        project_id: Uuid,
    ) -> QueryResult<Vec<ProjectInvitation>> {
        project_invitations::table
            .filter(project_invitations::project_id.eq(project_id))
            .filter(project_invitations::status.eq(InvitationStatus::Pending))
            .order(project_invitations::created_at.desc())
            .select(ProjectInvitation::as_select())
            .load(conn)
    }

    pub fn count_pending_for_project(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<i64> {
        project_invitations::table
            .filter(project_invitations::project_id.eq(project_id))
            .filter(project_invitations::status.eq(InvitationStatus::Pending))
            .count()
            .get_result(conn)
    }
}
