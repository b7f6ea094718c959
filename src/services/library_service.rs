use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::LibraryItemType,
    db::models::api::error_codes,
    db::models::library::{LibraryItem, LibraryListQuery, LibraryPage, NewLibraryItem, SaveSuggestedRequest},
    db::models::notification::{NewNotification, kinds},
    db::models::user::User,
    db::repositories::{library::LibraryRepo, notifications::NotificationsRepo, users::UsersRepo},
    error::{AppError, AppResult},
    validation::library::validate_save_suggested,
};

/// A stored item plus its owner, so the caller can decide on the email notice.
pub struct SavedItem {
    pub item: LibraryItem,
    pub owner: User,
}

impl SavedItem {
    pub fn wants_email(&self) -> bool {
        self.owner.notify_email_on_article
    }
}

pub struct LibraryService;

fn duplicate_result_error() -> AppError {
    AppError::conflict_with_code(
        "This article is already in your library",
        Some("result_id".to_string()),
        error_codes::LIBRARY_DUPLICATE_RESULT,
    )
}

impl LibraryService {
    /// `total` counts every item of the user regardless of the search filter.
    pub fn list(
        conn: &mut PgConnection,
        user_id: Uuid,
        query: &LibraryListQuery,
    ) -> AppResult<LibraryPage> {
        let (page, limit) = query.normalized();
        let search = query.search_term();
        let items = LibraryRepo::list_page(conn, user_id, search, (page - 1) * limit, limit)?;
        let total = LibraryRepo::count(conn, Some(user_id))?;

        tracing::debug!(
            user_id = %user_id,
            search = ?search,
            returned = items.len(),
            total,
            "Library page"
        );
        Ok(LibraryPage {
            items,
            total,
            page,
            limit,
        })
    }

    /// Inserts the item and the owner's notification in one transaction.
    fn store(
        conn: &mut PgConnection,
        new_item: NewLibraryItem,
        notice_body: &str,
    ) -> AppResult<SavedItem> {
        let owner = UsersRepo::find_by_id(conn, new_item.user_id)?
            .ok_or_else(|| AppError::not_found("User"))?;

        let item = conn.transaction::<LibraryItem, AppError, _>(|tx| {
            let item = LibraryRepo::insert(tx, &new_item).map_err(|e| match AppError::from(e) {
                AppError::Conflict { .. } => duplicate_result_error(),
                other => other,
            })?;
            NotificationsRepo::insert(
                tx,
                &NewNotification::new(
                    owner.id,
                    kinds::LIBRARY_ITEM,
                    format!("New article: {}", item.title),
                )
                .with_body(notice_body)
                .with_link(item.link.clone()),
            )?;
            Ok(item)
        })?;

        tracing::info!(item_id = %item.id, user_id = %owner.id, kind = %item.item_type.as_str(), "Library item saved");
        Ok(SavedItem { item, owner })
    }

    pub fn add_pdf(
        conn: &mut PgConnection,
        user_id: Uuid,
        title: String,
        summary: Option<String>,
        tags: Vec<String>,
        link: String,
    ) -> AppResult<SavedItem> {
        Self::store(
            conn,
            NewLibraryItem {
                user_id,
                title,
                summary: summary.unwrap_or_default(),
                tags,
                link,
                item_type: LibraryItemType::Pdf,
                result_id: None,
            },
            "A new PDF was added to your library",
        )
    }

    pub fn save_suggested(
        conn: &mut PgConnection,
        user_id: Uuid,
        req: &SaveSuggestedRequest,
    ) -> AppResult<SavedItem> {
        validate_save_suggested(req)?;
        let result_id = req.result_id.trim();
        if LibraryRepo::result_exists(conn, user_id, result_id)? {
            return Err(duplicate_result_error());
        }

        Self::store(
            conn,
            NewLibraryItem {
                user_id,
                title: req.title.trim().to_string(),
                summary: req.summary.clone().unwrap_or_default(),
                tags: Vec::new(),
                link: req.link.trim().to_string(),
                item_type: LibraryItemType::Link,
                result_id: Some(result_id.to_string()),
            },
            "A new link was added to your library",
        )
    }

    pub fn delete(conn: &mut PgConnection, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let item = LibraryRepo::find_by_id(conn, item_id)?
            .ok_or_else(|| AppError::not_found("Library item"))?;
        if item.user_id != user_id {
            return Err(AppError::forbidden("Not allowed to delete this item"));
        }
        LibraryRepo::delete_by_id(conn, item.id)?;
        Ok(())
    }
}
