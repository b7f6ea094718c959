use crate::schema::projects;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub subject_area: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = projects)]
pub struct NewProject {
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub subject_area: String,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = projects)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject_area: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate, Default)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "subjectArea")]
    pub subject_area: String,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "subjectArea")]
    pub subject_area: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ProjectStats {
    pub members: i64,
    /// Pending invitations; only reported to the owner.
    pub pending: i64,
}

/// One row of the members listing; the owner comes first with role `owner`.
#[derive(Serialize, Debug)]
pub struct ProjectMemberInfo {
    pub user: UserSummary,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}
