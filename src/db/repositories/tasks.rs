use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::TaskStatus;
use crate::db::models::project::Project;
use crate::db::models::task::{NewTask, Task};
use crate::db::models::user::User;
use crate::schema::{projects, tasks, users};

pub struct TasksRepo;

impl TasksRepo {
    pub fn insert(conn: &mut PgConnection, new_task: &NewTask) -> QueryResult<Task> {
        diesel::insert_into(tasks::table)
            .values(new_task)
            .returning(Task::as_returning())
            .get_result(conn)
    }

    pub fn find_in_project(
        conn: &mut PgConnection,
        project_id: Uuid,
        task_id: Uuid,
    ) -> QueryResult<Option<Task>> {
        tasks::table
            .filter(tasks::id.eq(task_id))
            .filter(tasks::project_id.eq(project_id))
            .select(Task::as_select())
            .first(conn)
            .optional()
    }

    pub fn list_with_creators(
        conn: &mut PgConnection,
        project_id: Uuid,
    ) -> QueryResult<Vec<(Task, User)>> {
        tasks::table
            .inner_join(users::table.on(users::id.eq(tasks::creator_id)))
            .filter(tasks::project_id.eq(project_id))
            .order(tasks::created_at.desc())
            .select((Task::as_select(), User::as_select()))
            .load(conn)
    }

    pub fn update_status(
        conn: &mut PgConnection,
        task_id: Uuid,
        status: TaskStatus,
    ) -> QueryResult<Task> {
        diesel::update(tasks::table.find(task_id))
            .set((tasks::status.eq(status), tasks::updated_at.eq(Utc::now())))
            .returning(Task::as_returning())
            .get_result(conn)
    }

    pub fn delete_by_id(conn: &mut PgConnection, task_id: Uuid) -> QueryResult<usize> {
        diesel::delete(tasks::table.find(task_id)).execute(conn)
    }

    /// Open tasks in the given projects that are either due inside
    /// `[now, until]` or undated and created at or after `recent_since`.
    pub fn list_upcoming(
        conn: &mut PgConnection,
        project_ids: &[Uuid],
        now: DateTime<Utc>,
        until: DateTime<Utc>,
        recent_since: DateTime<Utc>,
    ) -> QueryResult<Vec<(Task, Project, User)>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        tasks::table
            .inner_join(projects::table.on(projects::id.eq(tasks::project_id)))
            .inner_join(users::table.on(users::id.eq(tasks::creator_id)))
            .filter(tasks::project_id.eq_any(project_ids))
            .filter(tasks::status.eq_any(vec![TaskStatus::Pending, TaskStatus::InProgress]))
            .filter(
                tasks::due_date
                    .ge(now)
                    .and(tasks::due_date.le(until))
                    .or(tasks::due_date
                        .is_null()
                        .and(tasks::created_at.ge(recent_since))
                        .nullable()),
            )
            .select((Task::as_select(), Project::as_select(), User::as_select()))
            .load(conn)
    }
}
