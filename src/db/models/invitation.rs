use crate::db::enums::InvitationStatus;
use crate::schema::project_invitations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = project_invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectInvitation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_user_id: Option<Uuid>,
    pub invitee_email: String,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectInvitation {
    /// Whether `user_id`/`email` is the addressee of this invitation.
    pub fn is_addressed_to(&self, user_id: Uuid, email: &str) -> bool {
        self.invitee_user_id == Some(user_id) || self.invitee_email.eq_ignore_ascii_case(email)
    }
}

#[derive(Insertable)]
#[diesel(table_name = project_invitations)]
pub struct NewProjectInvitation {
    pub project_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_user_id: Option<Uuid>,
    pub invitee_email: String,
    pub status: InvitationStatus,
}

#[derive(Deserialize, Validate, Default)]
pub struct InviteRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize, Debug)]
pub struct InvitationCreated {
    pub ok: bool,
    pub invitation_id: Uuid,
}

/// An invitation addressed to the caller.
#[derive(Serialize, Debug)]
pub struct MyInvitationInfo {
    pub id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub inviter: Option<UserSummary>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

/// A pending invitation as seen by the project owner.
#[derive(Serialize, Debug)]
pub struct ProjectInvitationInfo {
    pub id: Uuid,
    pub invitee_email: String,
    pub invitee: Option<UserSummary>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}
