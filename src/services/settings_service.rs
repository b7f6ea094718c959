use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::models::user::{UpdateSettingsRequest, UserChanges, UserSettings},
    db::repositories::users::UsersRepo,
    error::{AppError, AppResult},
    validation::auth::validate_settings,
};

pub struct SettingsService;

impl SettingsService {
    pub fn get(conn: &mut PgConnection, user_id: Uuid) -> AppResult<UserSettings> {
        let user = UsersRepo::find_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User"))?;
        Ok(user.settings())
    }

    /// Only keys present in the request are written.
    pub fn update(
        conn: &mut PgConnection,
        user_id: Uuid,
        req: &UpdateSettingsRequest,
    ) -> AppResult<UserSettings> {
        validate_settings(req)?;
        let changes = UserChanges {
            notify_email_on_article: req.notify_email_on_article,
            language: req.language.clone(),
            theme: req.theme.clone(),
            ..Default::default()
        };
        if changes.is_empty() {
            return Self::get(conn, user_id);
        }

        let user = UsersRepo::update(
            conn,
            user_id,
            &UserChanges {
                updated_at: Some(Utc::now()),
                ..changes
            },
        )?;
        Ok(user.settings())
    }
}
