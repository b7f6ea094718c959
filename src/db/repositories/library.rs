use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use uuid::Uuid;

use crate::db::models::library::{LibraryItem, NewLibraryItem};
use crate::schema::library_items;

pub struct LibraryRepo;

/// `%term%` with LIKE wildcards in the term escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl LibraryRepo {
    pub fn insert(conn: &mut PgConnection, item: &NewLibraryItem) -> QueryResult<LibraryItem> {
        diesel::insert_into(library_items::table)
            .values(item)
            .returning(LibraryItem::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, item_id: Uuid) -> QueryResult<Option<LibraryItem>> {
        library_items::table
            .find(item_id)
            .select(LibraryItem::as_select())
            .first(conn)
            .optional()
    }

    pub fn result_exists(conn: &mut PgConnection, user_id: Uuid, result_id: &str) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(
            library_items::table
                .filter(library_items::user_id.eq(user_id))
                .filter(library_items::result_id.eq(result_id)),
        ))
        .get_result(conn)
    }

    /// One page of the user's items, newest first, optionally filtered by a
    /// case-insensitive match on title, summary or any tag.
    pub fn list_page(
        conn: &mut PgConnection,
        user_id: Uuid,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> QueryResult<Vec<LibraryItem>> {
        let mut query = library_items::table
            .filter(library_items::user_id.eq(user_id))
            .into_boxed();

        if let Some(term) = search {
            let pattern = like_pattern(term);
            let tag_match = sql::<Bool>("EXISTS (SELECT 1 FROM unnest(library_items.tags) AS tag WHERE tag ILIKE ")
                .bind::<Text, _>(pattern.clone())
                .sql(")");
            query = query.filter(
                library_items::title
                    .ilike(pattern.clone())
                    .or(library_items::summary.ilike(pattern))
                    .or(tag_match),
            );
        }

        query
            .order(library_items::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(LibraryItem::as_select())
            .load(conn)
    }

    pub fn count(conn: &mut PgConnection, user_id: Option<Uuid>) -> QueryResult<i64> {
        let mut query = library_items::table.into_boxed();
        if let Some(uid) = user_id {
            query = query.filter(library_items::user_id.eq(uid));
        }
        query.count().get_result(conn)
    }

    pub fn created_since(
        conn: &mut PgConnection,
        since: DateTime<Utc>,
        user_id: Option<Uuid>,
    ) -> QueryResult<Vec<DateTime<Utc>>> {
        let mut query = library_items::table
            .filter(library_items::created_at.ge(since))
            .select(library_items::created_at)
            .into_boxed();
        if let Some(uid) = user_id {
            query = query.filter(library_items::user_id.eq(uid));
        }
        query.load(conn)
    }

    pub fn delete_by_id(conn: &mut PgConnection, item_id: Uuid) -> QueryResult<usize> {
        diesel::delete(library_items::table.find(item_id)).execute(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(like_pattern("graph"), "%graph%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }
}
