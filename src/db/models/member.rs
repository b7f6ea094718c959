use crate::schema::project_members;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

pub const MEMBER_ROLE: &str = "member";
pub const OWNER_ROLE: &str = "owner";

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectMember {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = project_members)]
pub struct NewProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}

impl NewProjectMember {
    pub fn member(project_id: Uuid, user_id: Uuid) -> Self {
        Self {
            project_id,
            user_id,
            role: MEMBER_ROLE.to_string(),
        }
    }
}
