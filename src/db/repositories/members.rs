use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::member::{NewProjectMember, ProjectMember};
use crate::db::models::user::User;
use crate::schema::{project_members, users};

pub struct MembersRepo;

impl MembersRepo {
    pub fn is_member(conn: &mut PgConnection, project_id: Uuid, user_id: Uuid) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(
            project_members::table
                .filter(project_members::project_id.eq(project_id))
                .filter(project_members::user_id.eq(user_id)),
        ))
        .get_result(conn)
    }

    /// Inserts the membership unless it already exists. Returns the number of rows written.
    pub fn insert_if_absent(conn: &mut PgConnection, member: &NewProjectMember) -> QueryResult<usize> {
        diesel::insert_into(project_members::table)
            .values(member)
            .on_conflict((project_members::project_id, project_members::user_id))
            .do_nothing()
            .execute(conn)
    }

    pub fn list_with_users(
        conn: &mut PgConnection,
        project_id: Uuid,
    ) -> QueryResult<Vec<(ProjectMember, User)>> {
        project_members::table
            .inner_join(users::table)
            .filter(project_members::project_id.eq(project_id))
            .order(project_members::created_at.asc())
            .select((ProjectMember::as_select(), User::as_select()))
            .load(conn)
    }

    pub fn count_for_project(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<i64> {
        project_members::table
            .filter(project_members::project_id.eq(project_id))
            .count()
            .get_result(conn)
    }

    pub fn remove(conn: &mut PgConnection, project_id: Uuid, user_id: Uuid) -> QueryResult<usize> {
        diesel::delete(
            project_members::table
                .filter(project_members::project_id.eq(project_id))
                .filter(project_members::user_id.eq(user_id)),
        )
        .execute(conn)
    }
}
