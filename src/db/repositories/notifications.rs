use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::notification::{NewNotification, Notification};
use crate::schema::notifications;

pub const RECENT_LIMIT: i64 = 100;

pub struct NotificationsRepo;

impl NotificationsRepo {
    pub fn insert(conn: &mut PgConnection, new_n: &NewNotification) -> QueryResult<Notification> {
        diesel::insert_into(notifications::table)
            .values(new_n)
            .returning(Notification::as_returning())
            .get_result(conn)
    }

    pub fn list_recent(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Notification>> {
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order(notifications::created_at.desc())
            .limit(RECENT_LIMIT)
            .select(Notification::as_select())
            .load(conn)
    }

    pub fn mark_read(conn: &mut PgConnection, user_id: Uuid, id: Uuid) -> QueryResult<Option<Notification>> {
        diesel::update(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::user_id.eq(user_id)),
        )
        .set((notifications::read.eq(true), notifications::updated_at.eq(Utc::now())))
        .returning(Notification::as_returning())
        .get_result(conn)
        .optional()
    }

    pub fn mark_all_read(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<usize> {
        diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::read.eq(false)),
        )
        .set((notifications::read.eq(true), notifications::updated_at.eq(Utc::now())))
        .execute(conn)
    }

    pub fn unread_count(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<i64> {
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(conn)
    }
}
