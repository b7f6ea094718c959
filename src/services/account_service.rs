use chrono::{Duration, Utc};
use diesel::prelude::*;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    config::Config,
    db::enums::UserRole,
    db::models::api::error_codes,
    db::models::user::{
        AuthResponse, CheckEmailResponse, LoginRequest, NewUser, RegisterRequest,
        ResetPasswordRequest, UpdateMeRequest, User, UserChanges,
    },
    db::repositories::users::UsersRepo,
    error::{AppError, AppResult},
    utils::AssetUrlHelper,
    validation::{
        auth::{validate_email, validate_register, validate_reset_password},
        rules::normalize_email,
    },
};

pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

pub struct AccountService;

/// `admin` needs the configured creation secret; otherwise only the
/// self-assignable roles are honored and anything else becomes `user`.
pub fn resolve_register_role(
    requested: Option<&str>,
    admin_key: Option<&str>,
    admin_secret: Option<&str>,
) -> UserRole {
    let wants_admin = requested.is_some_and(|r| r.trim().eq_ignore_ascii_case("admin"));
    if wants_admin {
        let secret = admin_secret.filter(|s| !s.is_empty());
        return match (secret, admin_key) {
            (Some(secret), Some(key)) if key == secret => UserRole::Admin,
            _ => UserRole::User,
        };
    }
    UserRole::self_assignable(requested)
}

pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

pub fn generate_reset_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub fn email_taken_error() -> AppError {
    AppError::conflict_with_code(
        "Email is already in use",
        Some("email".to_string()),
        error_codes::USER_EMAIL_EXISTS,
    )
}

pub fn auth_response(user: &User, token: String, assets: &AssetUrlHelper) -> AuthResponse {
    AuthResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        avatar_url: user.avatar_url.as_deref().map(|u| assets.process_url(u)),
        token,
    }
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

impl AccountService {
    pub fn register(
        conn: &mut PgConnection,
        config: &Config,
        req: &RegisterRequest,
    ) -> AppResult<User> {
        validate_register(req)?;
        let email = normalize_email(&req.email);

        if UsersRepo::email_taken(conn, &email, None)? {
            return Err(email_taken_error());
        }

        let role = resolve_register_role(
            req.role.as_deref(),
            req.admin_key.as_deref(),
            config.admin_creation_secret.as_deref(),
        );

        let new_user = NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash: bcrypt::hash(&req.password, config.bcrypt_cost)?,
            role,
            notify_email_on_article: config.notify_email_on_article,
        };

        let user = UsersRepo::insert(conn, &new_user).map_err(|e| match AppError::from(e) {
            AppError::Conflict { .. } => email_taken_error(),
            other => other,
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    pub fn login(conn: &mut PgConnection, req: &LoginRequest) -> AppResult<User> {
        let email = normalize_email(&req.email);
        let invalid = || AppError::auth("Invalid email or password");

        let user = UsersRepo::find_by_email(conn, &email)?.ok_or_else(invalid)?;
        if !verify_password(&req.password, &user.password_hash)? {
            return Err(invalid());
        }
        Ok(user)
    }

    pub fn me(conn: &mut PgConnection, user_id: Uuid) -> AppResult<User> {
        UsersRepo::find_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User"))
    }

    /// Email and password changes both require the current password.
    pub fn update_me(
        conn: &mut PgConnection,
        user_id: Uuid,
        req: &UpdateMeRequest,
        bcrypt_cost: u32,
    ) -> AppResult<User> {
        let user = Self::me(conn, user_id)?;
        let mut changes = UserChanges::default();

        if let Some(name) = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            changes.name = Some(name.to_string());
        }

        let check_current = |user: &User| -> AppResult<()> {
            let current = req
                .current_password
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| AppError::validation("Current password is required"))?;
            if !verify_password(current, &user.password_hash)? {
                return Err(AppError::validation("Current password is incorrect"));
            }
            Ok(())
        };

        if let Some(raw_email) = req.email.as_deref().filter(|e| !e.trim().is_empty()) {
            let email = normalize_email(raw_email);
            if email != user.email {
                validate_email(&email)?;
                if UsersRepo::email_taken(conn, &email, Some(user.id))? {
                    return Err(email_taken_error());
                }
                check_current(&user)?;
                changes.email = Some(email);
            }
        }

        if let Some(new_password) = req.new_password.as_deref().filter(|p| !p.is_empty()) {
            check_current(&user)?;
            changes.password_hash = Some(bcrypt::hash(new_password, bcrypt_cost)?);
        }

        if changes.is_empty() {
            return Ok(user);
        }
        changes.updated_at = Some(Utc::now());
        Ok(UsersRepo::update(conn, user.id, &changes)?)
    }

    pub fn delete_me(conn: &mut PgConnection, user_id: Uuid) -> AppResult<()> {
        if UsersRepo::delete_by_id(conn, user_id)? == 0 {
            return Err(AppError::not_found("User"));
        }
        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    pub fn check_email(
        conn: &mut PgConnection,
        user_id: Uuid,
        email: &str,
    ) -> AppResult<CheckEmailResponse> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(CheckEmailResponse {
                available: false,
                reason: Some("empty".to_string()),
            });
        }
        let taken = UsersRepo::email_taken(conn, &email, Some(user_id))?;
        Ok(CheckEmailResponse {
            available: !taken,
            reason: taken.then(|| "taken".to_string()),
        })
    }

    pub fn set_avatar(conn: &mut PgConnection, user_id: Uuid, url: &str) -> AppResult<User> {
        let changes = UserChanges {
            avatar_url: Some(url.to_string()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        Ok(UsersRepo::update(conn, user_id, &changes)?)
    }

    /// Stores the hash of a fresh token and returns the user with the raw token.
    pub fn forgot_password(conn: &mut PgConnection, email: &str) -> AppResult<(User, String)> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        let user = UsersRepo::find_by_email(conn, &email)?
            .ok_or_else(|| AppError::not_found("User"))?;

        let raw = generate_reset_token();
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        UsersRepo::set_reset_token(conn, user.id, &hash_reset_token(&raw), expires)?;
        Ok((user, raw))
    }

    pub fn reset_password(
        conn: &mut PgConnection,
        req: &ResetPasswordRequest,
        bcrypt_cost: u32,
    ) -> AppResult<()> {
        validate_reset_password(req)?;
        let email = normalize_email(&req.email);
        let user = UsersRepo::find_by_reset_token(
            conn,
            &email,
            &hash_reset_token(req.token.trim()),
            Utc::now(),
        )?
        .ok_or_else(|| AppError::validation("Invalid or expired token"))?;

        let hash = bcrypt::hash(&req.password, bcrypt_cost)?;
        UsersRepo::reset_password(conn, user.id, &hash)?;
        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}
