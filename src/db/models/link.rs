use crate::schema::{project_resource_links, project_work_links};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = project_resource_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResourceLink {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub url: String,
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = project_resource_links)]
pub struct NewResourceLink {
    pub project_id: Uuid,
    pub name: String,
    pub url: String,
    pub added_by: Option<Uuid>,
}

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = project_work_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkLink {
    pub project_id: Uuid,
    pub url: String,
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Work link as returned to clients; a project without one reports an empty `url`.
#[derive(Serialize, Clone, Debug)]
pub struct WorkLinkInfo {
    pub project_id: Uuid,
    pub url: String,
    pub added_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkLinkInfo {
    pub fn empty(project_id: Uuid) -> Self {
        Self {
            project_id,
            url: String::new(),
            added_by: None,
            updated_at: None,
        }
    }
}

impl From<WorkLink> for WorkLinkInfo {
    fn from(link: WorkLink) -> Self {
        Self {
            project_id: link.project_id,
            url: link.url,
            added_by: link.added_by,
            updated_at: Some(link.updated_at),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = project_work_links)]
pub struct NewWorkLink {
    pub project_id: Uuid,
    pub url: String,
    pub added_by: Option<Uuid>,
}

#[derive(Deserialize, Validate, Default)]
pub struct AddResourceLinkRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Deserialize, Validate, Default)]
pub struct SetWorkLinkRequest {
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_work_link_serializes_with_empty_url() {
        let project_id = Uuid::new_v4();
        let json = serde_json::to_value(WorkLinkInfo::empty(project_id)).unwrap();
        assert_eq!(json["url"], "");
        assert_eq!(json["project_id"], project_id.to_string());
        assert!(json["updated_at"].is_null());
    }
}
