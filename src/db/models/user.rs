use crate::db::enums::UserRole;
use crate::schema::users;
use crate::utils::AssetUrlHelper;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub notify_email_on_article: bool,
    pub language: String,
    pub theme: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub notify_email_on_article: bool,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub avatar_url: Option<String>,
    pub notify_email_on_article: Option<bool>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.avatar_url.is_none()
            && self.notify_email_on_article.is_none()
            && self.language.is_none()
            && self.theme.is_none()
    }
}

/// The caller as seen by the auth layer; this is what the user cache stores.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl UserSummary {
    pub fn from_user(user: &User, assets: &AssetUrlHelper) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.as_deref().map(|u| assets.process_url(u)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserSettings {
    pub notify_email_on_article: bool,
    pub language: String,
    pub theme: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub settings: UserSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn settings(&self) -> UserSettings {
        UserSettings {
            notify_email_on_article: self.notify_email_on_article,
            language: self.language.clone(),
            theme: self.theme.clone(),
        }
    }

    pub fn profile(&self, assets: &AssetUrlHelper) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar_url: self.avatar_url.as_deref().map(|u| assets.process_url(u)),
            settings: self.settings(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Deserialize, Validate, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
    #[serde(alias = "adminKey")]
    pub admin_key: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub token: String,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(alias = "newPassword")]
    pub new_password: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckEmailQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct CheckEmailResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

#[derive(Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Deserialize, Validate, Default)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateSettingsRequest {
    #[serde(alias = "notifyEmailOnArticle")]
    pub notify_email_on_article: Option<bool>,
    pub language: Option<String>,
    pub theme: Option<String>,
}

#[derive(Deserialize, Validate, Default)]
pub struct AdminCreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Deserialize, Validate, Default)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Admin view of an account: profile fields without secrets.
#[derive(Serialize, Debug)]
pub struct AdminUserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUserInfo {
    pub fn from_user(user: &User, assets: &AssetUrlHelper) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar_url: user.avatar_url.as_deref().map(|u| assets.process_url(u)),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
