use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::link::{NewResourceLink, NewWorkLink, ResourceLink, WorkLink};
use crate::schema::{project_resource_links, project_work_links};

pub struct LinksRepo;

impl LinksRepo {
    pub fn list_resources(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<Vec<ResourceLink>> {
        project_resource_links::table
            .filter(project_resource_links::project_id.eq(project_id))
            .order(project_resource_links::created_at.desc())
            .select(ResourceLink::as_select())
            .load(conn)
    }

    pub fn insert_resource(conn: &mut PgConnection, link: &NewResourceLink) -> QueryResult<ResourceLink> {
        diesel::insert_into(project_resource_links::table)
            .values(link)
            .returning(ResourceLink::as_returning())
            .get_result(conn)
    }

    pub fn delete_resource(
        conn: &mut PgConnection,
        project_id: Uuid,
        link_id: Uuid,
    ) -> QueryResult<usize> {
        diesel::delete(
            project_resource_links::table
                .filter(project_resource_links::id.eq(link_id))
                .filter(project_resource_links::project_id.eq(project_id)),
        )
        .execute(conn)
    }

    pub fn find_work_link(conn: &mut PgConnection, project_id: Uuid) -> QueryResult<Option<WorkLink>> {
        project_work_links::table
            .find(project_id)
            .select(WorkLink::as_select())
            .first(conn)
            .optional()
    }

    pub fn upsert_work_link(conn: &mut PgConnection, link: &NewWorkLink) -> QueryResult<WorkLink> {
        diesel::insert_into(project_work_links::table)
            .values(link)
            .on_conflict(project_work_links::project_id)
            .do_update()
            .set((
                project_work_links::url.eq(&link.url),
                project_work_links::added_by.eq(link.added_by),
                project_work_links::updated_at.eq(Utc::now()),
            ))
            .returning(WorkLink::as_returning())
            .get_result(conn)
    }
}
