use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::models::notification::{MarkedRead, Notification, UnreadCount},
    db::repositories::notifications::NotificationsRepo,
    error::{AppError, AppResult},
};

pub struct NotificationsService;

impl NotificationsService {
    pub fn list(conn: &mut PgConnection, user_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(NotificationsRepo::list_recent(conn, user_id)?)
    }

    /// 404 unless the notification belongs to the caller.
    pub fn mark_read(conn: &mut PgConnection, user_id: Uuid, id: Uuid) -> AppResult<Notification> {
        NotificationsRepo::mark_read(conn, user_id, id)?
            .ok_or_else(|| AppError::not_found("Notification"))
    }

    pub fn mark_all_read(conn: &mut PgConnection, user_id: Uuid) -> AppResult<MarkedRead> {
        let updated = NotificationsRepo::mark_all_read(conn, user_id)?;
        Ok(MarkedRead { updated })
    }

    pub fn unread_count(conn: &mut PgConnection, user_id: Uuid) -> AppResult<UnreadCount> {
        let count = NotificationsRepo::unread_count(conn, user_id)?;
        Ok(UnreadCount { count })
    }
}
