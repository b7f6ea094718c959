use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    config::Config,
    db::enums::UserRole,
    db::models::audit::{ACTION_ROLE_CHANGE, NewAuditLog},
    db::models::user::{AdminCreateUserRequest, AdminUpdateUserRequest, NewUser, User, UserChanges},
    db::repositories::{audit::AuditRepo, users::UsersRepo},
    error::{AppError, AppResult},
    services::{account_service::email_taken_error, context::RequestContext},
    validation::{
        auth::{validate_admin_create, validate_email},
        rules::normalize_email,
    },
};

pub struct AdminUsersService;

pub fn parse_role(raw: &str) -> AppResult<UserRole> {
    raw.parse::<UserRole>()
        .map_err(|_| AppError::validation(format!("Invalid role: {}", raw.trim())))
}

/// Superadmin accounts, and the superadmin role itself, are only handled by superadmins.
pub fn check_role_authority(
    actor: UserRole,
    target: Option<UserRole>,
    requested: Option<UserRole>,
) -> AppResult<()> {
    if actor == UserRole::Superadmin {
        return Ok(());
    }
    if target == Some(UserRole::Superadmin) {
        return Err(AppError::forbidden("Only a superadmin can modify a superadmin"));
    }
    if requested == Some(UserRole::Superadmin) {
        return Err(AppError::forbidden("Only a superadmin can assign the superadmin role"));
    }
    Ok(())
}

impl AdminUsersService {
    pub fn list(conn: &mut PgConnection) -> AppResult<Vec<User>> {
        Ok(UsersRepo::list_all(conn)?)
    }

    pub fn get(conn: &mut PgConnection, user_id: Uuid) -> AppResult<User> {
        UsersRepo::find_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User"))
    }

    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        config: &Config,
        req: &AdminCreateUserRequest,
    ) -> AppResult<User> {
        validate_admin_create(req)?;
        let role = match req.role.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(raw) => parse_role(raw)?,
            None => UserRole::User,
        };
        check_role_authority(ctx.role, None, Some(role))?;

        let email = normalize_email(&req.email);
        if UsersRepo::email_taken(conn, &email, None)? {
            return Err(email_taken_error());
        }

        let user = UsersRepo::insert(
            conn,
            &NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash: bcrypt::hash(&req.password, config.bcrypt_cost)?,
                role,
                notify_email_on_article: config.notify_email_on_article,
            },
        )?;

        tracing::info!(actor = %ctx.user_id, user_id = %user.id, role = %role, "Admin created user");
        Ok(user)
    }

    /// Applies the changes and, when the role moves, records an audit entry in the same transaction.
    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        user_id: Uuid,
        req: &AdminUpdateUserRequest,
        bcrypt_cost: u32,
    ) -> AppResult<User> {
        let target = Self::get(conn, user_id)?;
        let requested = match req.role.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(raw) => Some(parse_role(raw)?),
            None => None,
        };
        check_role_authority(ctx.role, Some(target.role), requested)?;

        let mut changes = UserChanges::default();
        if let Some(name) = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            changes.name = Some(name.to_string());
        }
        if let Some(raw_email) = req.email.as_deref().filter(|e| !e.trim().is_empty()) {
            let email = normalize_email(raw_email);
            if email != target.email {
                validate_email(&email)?;
                if UsersRepo::email_taken(conn, &email, Some(target.id))? {
                    return Err(email_taken_error());
                }
                changes.email = Some(email);
            }
        }
        if let Some(password) = req.password.as_deref().filter(|p| !p.is_empty()) {
            changes.password_hash = Some(bcrypt::hash(password, bcrypt_cost)?);
        }
        let role_change = requested.filter(|r| *r != target.role);
        changes.role = role_change;

        if changes.is_empty() {
            return Ok(target);
        }
        changes.updated_at = Some(Utc::now());

        conn.transaction::<User, AppError, _>(|tx| {
            let updated = UsersRepo::update(tx, target.id, &changes)?;
            if let Some(new_role) = role_change {
                AuditRepo::insert(
                    tx,
                    &NewAuditLog {
                        actor_id: Some(ctx.user_id),
                        target_user_id: Some(target.id),
                        action: ACTION_ROLE_CHANGE.to_string(),
                        old_role: Some(target.role.to_string()),
                        new_role: Some(new_role.to_string()),
                        ip: ctx.ip.clone(),
                        meta: None,
                    },
                )?;
                tracing::info!(
                    actor = %ctx.user_id,
                    target = %target.id,
                    from = %target.role,
                    to = %new_role,
                    "Role changed"
                );
            }
            Ok(updated)
        })
    }

    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, user_id: Uuid) -> AppResult<()> {
        let target = Self::get(conn, user_id)?;
        check_role_authority(ctx.role, Some(target.role), None)?;
        UsersRepo::delete_by_id(conn, target.id)?;
        tracing::info!(actor = %ctx.user_id, user_id = %target.id, "Admin deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_cannot_touch_superadmins() {
        assert!(matches!(
            check_role_authority(UserRole::Admin, Some(UserRole::Superadmin), None),
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            check_role_authority(UserRole::Admin, Some(UserRole::User), Some(UserRole::Superadmin)),
            Err(AppError::Forbidden { .. })
        ));
        assert!(check_role_authority(UserRole::Admin, Some(UserRole::User), Some(UserRole::Admin)).is_ok());
        assert!(
            check_role_authority(UserRole::Superadmin, Some(UserRole::Superadmin), Some(UserRole::User))
                .is_ok()
        );
    }

    #[test]
    fn unknown_roles_are_rejected() {
        assert!(matches!(parse_role("owner"), Err(AppError::Validation { .. })));
        assert_eq!(parse_role(" Student ").unwrap(), UserRole::Student);
    }
}
