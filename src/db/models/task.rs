use crate::db::enums::TaskStatus;
use crate::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTask {
    pub project_id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate, Default)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(alias = "dueInDays")]
    pub due_in_days: Option<i64>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateTaskStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize)]
pub struct UpcomingTasksQuery {
    pub days: Option<i64>,
}

#[derive(Serialize, Debug)]
pub struct TaskInfo {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub creator: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct UpcomingTask {
    #[serde(flatten)]
    pub task: TaskInfo,
    pub project_name: String,
}
