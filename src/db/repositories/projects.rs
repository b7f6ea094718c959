use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::project::{NewProject, Project, ProjectChanges};
use crate::schema::{project_members, projects};

pub struct ProjectsRepo;

impl ProjectsRepo {
    pub fn insert(conn: &mut PgConnection, new_project: &NewProject) -> QueryResult<Project> {
        diesel::insert_into(projects::table)
            .values(new_project)
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<Option<Project>> {
        projects::table
            .find(project_id)
            .select(Project::as_select())
            .first(conn)
            .optional()
    }

    /// Projects the user owns or belongs to, newest first. Each project appears once.
    pub fn list_accessible(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Project>> {
        let member_of = project_members::table
            .filter(project_members::user_id.eq(user_id))
            .select(project_members::project_id);

        projects::table
            .filter(
                projects::owner_id
                    .eq(user_id)
                    .or(projects::id.eq_any(member_of)),
            )
            .order(projects::created_at.desc())
            .select(Project::as_select())
            .load(conn)
    }

    pub fn accessible_ids(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Uuid>> {
        let member_of = project_members::table
            .filter(project_members::user_id.eq(user_id))
            .select(project_members::project_id);

        projects::table
            .filter(
                projects::owner_id
                    .eq(user_id)
                    .or(projects::id.eq_any(member_of)),
            )
            .select(projects::id)
            .load(conn)
    }

    pub fn update(
        conn: &mut PgConnection,
        project_id: Uuid,
        mut changes: ProjectChanges,
    ) -> QueryResult<Project> {
        changes.updated_at = Some(Utc::now());
        diesel::update(projects::table.find(project_id))
            .set(&changes)
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn delete_by_id(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<usize> {
        diesel::delete(projects::table.find(project_id)).execute(conn)
    }

    pub fn count(conn: &mut PgConnection, owner: Option<Uuid>) -> QueryResult<i64> {
        let mut query = projects::table.into_boxed();
        if let Some(owner_id) = owner {
            query = query.filter(projects::owner_id.eq(owner_id));
        }
        query.count().get_result(conn)
    }

    pub fn created_since(
        conn: &mut PgConnection,
        since: chrono::DateTime<Utc>,
        owner: Option<Uuid>,
    ) -> QueryResult<Vec<chrono::DateTime<Utc>>> {
        let mut query = projects::table
            .filter(projects::created_at.ge(since))
            .select(projects::created_at)
            .into_boxed();
        if let Some(owner_id) = owner {
            query = query.filter(projects::owner_id.eq(owner_id));
        }
        query.load(conn)
    }
}
