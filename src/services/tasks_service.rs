use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::{
    db::enums::TaskStatus,
    db::models::task::{CreateTaskRequest, NewTask, Task, TaskInfo, UpcomingTask},
    db::models::user::{User, UserSummary},
    db::repositories::{projects::ProjectsRepo, tasks::TasksRepo},
    error::{AppError, AppResult},
    services::projects_service::ProjectsService,
    utils::AssetUrlHelper,
    validation::task::{
        UNDATED_RECENT_DAYS, parse_task_status, resolve_due_date, upcoming_window_days,
        validate_task_title,
    },
};

pub struct TasksService;

fn task_info(task: Task, creator: Option<&User>, assets: &AssetUrlHelper) -> TaskInfo {
    TaskInfo {
        id: task.id,
        project_id: task.project_id,
        title: task.title,
        status: task.status,
        due_date: task.due_date,
        creator: creator.map(|u| UserSummary::from_user(u, assets)),
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

/// Due date ascending with undated tasks first, ties broken newest first.
pub fn upcoming_order(a: &Task, b: &Task) -> Ordering {
    let by_due = match (a.due_date, b.due_date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    };
    by_due.then_with(|| b.created_at.cmp(&a.created_at))
}

impl TasksService {
    pub fn list(
        conn: &mut PgConnection,
        assets: &AssetUrlHelper,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<Vec<TaskInfo>> {
        let (project, _) = ProjectsService::require_visible(conn, project_id, user_id)?;
        Ok(TasksRepo::list_with_creators(conn, project.id)?
            .into_iter()
            .map(|(task, creator)| task_info(task, Some(&creator), assets))
            .collect())
    }

    pub fn create(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        req: &CreateTaskRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Task> {
        validate_task_title(&req.title)?;
        let (project, _) = ProjectsService::require_visible(conn, project_id, user_id)?;

        let task = TasksRepo::insert(
            conn,
            &NewTask {
                project_id: project.id,
                creator_id: user_id,
                title: req.title.trim().to_string(),
                status: TaskStatus::Pending,
                due_date: Some(resolve_due_date(req.due_date, req.due_in_days, now)?),
            },
        )?;
        tracing::info!(task_id = %task.id, project_id = %project.id, "Task created");
        Ok(task)
    }

    fn load_for_change(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        task_id: Uuid,
    ) -> AppResult<Task> {
        let (project, _) = ProjectsService::require_participant(conn, project_id, user_id)?;
        TasksRepo::find_in_project(conn, project.id, task_id)?
            .ok_or_else(|| AppError::not_found("Task"))
    }

    pub fn update_status(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        task_id: Uuid,
        raw_status: &str,
    ) -> AppResult<Task> {
        let status = parse_task_status(raw_status)?;
        let task = Self::load_for_change(conn, user_id, project_id, task_id)?;
        Ok(TasksRepo::update_status(conn, task.id, status)?)
    }

    pub fn delete(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        task_id: Uuid,
    ) -> AppResult<()> {
        let task = Self::load_for_change(conn, user_id, project_id, task_id)?;
        TasksRepo::delete_by_id(conn, task.id)?;
        Ok(())
    }

    pub fn upcoming(
        conn: &mut PgConnection,
        assets: &AssetUrlHelper,
        user_id: Uuid,
        days: Option<i64>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<UpcomingTask>> {
        let project_ids = ProjectsRepo::accessible_ids(conn, user_id)?;
        let until = now + Duration::days(upcoming_window_days(days));
        let recent_since = now - Duration::days(UNDATED_RECENT_DAYS);

        let mut rows = TasksRepo::list_upcoming(conn, &project_ids, now, until, recent_since)?;
        rows.sort_by(|a, b| upcoming_order(&a.0, &b.0));

        Ok(rows
            .into_iter()
            .map(|(task, project, creator)| UpcomingTask {
                task: task_info(task, Some(&creator), assets),
                project_name: project.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(due_in_hours: Option<i64>, created_hours_ago: i64) -> Task {
        let base = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            title: "t".into(),
            status: TaskStatus::Pending,
            due_date: due_in_hours.map(|h| base + Duration::hours(h)),
            created_at: base - Duration::hours(created_hours_ago),
            updated_at: base,
        }
    }

    #[test]
    fn orders_by_due_date_then_newest() {
        let later = task(Some(48), 1);
        let sooner_old = task(Some(24), 10);
        let sooner_new = task(Some(24), 2);
        let undated = task(None, 3);

        let mut tasks = vec![later.clone(), sooner_old.clone(), undated.clone(), sooner_new.clone()];
        // give the two "sooner" tasks the same instant
        tasks[3].due_date = tasks[1].due_date;
        let expected_ids = vec![undated.id, sooner_new.id, sooner_old.id, later.id];

        tasks.sort_by(upcoming_order);
        let ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected_ids);
    }
}
