use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::models::audit::AuditLogInfo,
    db::models::user::UserSummary,
    db::repositories::{audit::AuditRepo, users::UsersRepo},
    error::AppResult,
    utils::AssetUrlHelper,
};

pub struct AuditService;

impl AuditService {
    /// Newest entries first, with actor and target resolved when they still exist.
    pub fn list(
        conn: &mut PgConnection,
        assets: &AssetUrlHelper,
        limit: i64,
    ) -> AppResult<Vec<AuditLogInfo>> {
        let logs = AuditRepo::list_recent(conn, limit)?;

        let mut ids: Vec<Uuid> = logs
            .iter()
            .flat_map(|l| [l.actor_id, l.target_user_id])
            .flatten()
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<Uuid, UserSummary> = UsersRepo::find_many(conn, &ids)?
            .iter()
            .map(|u| (u.id, UserSummary::from_user(u, assets)))
            .collect();

        Ok(logs
            .into_iter()
            .map(|log| AuditLogInfo {
                id: log.id,
                actor: log.actor_id.and_then(|id| users.get(&id).cloned()),
                target: log.target_user_id.and_then(|id| users.get(&id).cloned()),
                action: log.action,
                old_role: log.old_role,
                new_role: log.new_role,
                ip: log.ip,
                meta: log.meta,
                created_at: log.created_at,
            })
            .collect())
    }
}
