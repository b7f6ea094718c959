use crate::schema::audit_logs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

pub const ACTION_ROLE_CHANGE: &str = "role_change";
pub const DEFAULT_AUDIT_LIMIT: i64 = 100;
pub const MAX_AUDIT_LIMIT: i64 = 500;

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub target_user_id: Option<Uuid>,
    pub action: String,
    pub old_role: Option<String>,
    pub new_role: Option<String>,
    pub ip: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditLog {
    pub actor_id: Option<Uuid>,
    pub target_user_id: Option<Uuid>,
    pub action: String,
    pub old_role: Option<String>,
    pub new_role: Option<String>,
    pub ip: Option<String>,
    pub meta: Option<serde_json::Value>,
}

#[derive(Serialize, Debug)]
pub struct AuditLogInfo {
    pub id: Uuid,
    pub action: String,
    pub old_role: Option<String>,
    pub new_role: Option<String>,
    pub ip: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub actor: Option<UserSummary>,
    pub target: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Default)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

impl AuditLogQuery {
    pub fn clamped_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .clamp(1, MAX_AUDIT_LIMIT)
    }
}
