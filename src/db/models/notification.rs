use crate::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

pub mod kinds {
    pub const PROJECT_INVITE: &str = "project_invite";
    pub const INVITE_ACCEPTED: &str = "invite_accepted";
    pub const INVITE_DECLINED: &str = "invite_declined";
    pub const INVITE_CANCELED: &str = "invite_canceled";
    pub const MEMBER_REMOVED: &str = "member_removed";
    pub const LIBRARY_ITEM: &str = "library_item";
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub link: Option<String>,
    pub read: bool,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub link: Option<String>,
    pub kind: String,
}

impl NewNotification {
    pub fn new(user_id: Uuid, kind: &str, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: None,
            link: None,
            kind: kind.to_string(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Serialize)]
pub struct MarkedRead {
    pub updated: usize,
}
