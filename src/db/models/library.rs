use crate::db::enums::LibraryItemType;
use crate::db::models::api::{Pagination, ResponseMeta};
use crate::schema::library_items;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = library_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LibraryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub link: String,
    pub item_type: LibraryItemType,
    pub result_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = library_items)]
pub struct NewLibraryItem {
    pub user_id: Uuid,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub link: String,
    pub item_type: LibraryItemType,
    pub result_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct LibraryListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl LibraryListQuery {
    /// Page is at least 1; limit falls back to the default and is capped.
    pub fn normalized(&self) -> (i64, i64) {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = match self.limit {
            Some(l) if l >= 1 => l.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        (page, limit)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Serialize, Debug)]
pub struct LibraryPage {
    pub items: Vec<LibraryItem>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl LibraryPage {
    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            pagination: Some(Pagination::new(self.page, self.limit, self.total)),
            total_count: Some(self.total),
        }
    }
}

#[derive(Deserialize, Validate, Default)]
pub struct SaveSuggestedRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub summary: Option<String>,
    #[serde(default, alias = "resultId")]
    pub result_id: String,
}

/// Text fields collected from a PDF upload form.
#[derive(Debug, Default)]
pub struct PdfUploadForm {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<String>,
    pub item_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paging() {
        let q = LibraryListQuery::default();
        assert_eq!(q.normalized(), (1, 20));

        let q = LibraryListQuery {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(q.normalized(), (1, 50));

        let q = LibraryListQuery {
            page: Some(3),
            limit: Some(-2),
            ..Default::default()
        };
        assert_eq!(q.normalized(), (3, 20));
    }

    #[test]
    fn blank_search_is_ignored() {
        let q = LibraryListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(q.search_term(), None);
    }
}
