use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::user::{NewUser, User, UserChanges};
use crate::schema::users;

pub struct UsersRepo;

impl UsersRepo {
    pub fn insert(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Option<User>> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_many(conn: &mut PgConnection, ids: &[Uuid]) -> QueryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        users::table
            .filter(users::id.eq_any(ids))
            .select(User::as_select())
            .load(conn)
    }

    /// True when another account (not `exclude`) already uses `email`.
    pub fn email_taken(
        conn: &mut PgConnection,
        email: &str,
        exclude: Option<Uuid>,
    ) -> QueryResult<bool> {
        let mut query = users::table.filter(users::email.eq(email)).into_boxed();
        if let Some(id) = exclude {
            query = query.filter(users::id.ne(id));
        }
        diesel::select(diesel::dsl::exists(query)).get_result(conn)
    }

    pub fn list_all(conn: &mut PgConnection) -> QueryResult<Vec<User>> {
        users::table
            .order(users::created_at.desc())
            .select(User::as_select())
            .load(conn)
    }

    pub fn update(
        conn: &mut PgConnection,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> QueryResult<User> {
        diesel::update(users::table.find(user_id))
            .set(changes)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn set_reset_token(
        conn: &mut PgConnection,
        user_id: Uuid,
        token_hash: &str,
        expires: DateTime<Utc>,
    ) -> QueryResult<usize> {
        diesel::update(users::table.find(user_id))
            .set((
                users::password_reset_token.eq(Some(token_hash)),
                users::password_reset_expires.eq(Some(expires)),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    pub fn find_by_reset_token(
        conn: &mut PgConnection,
        email: &str,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> QueryResult<Option<User>> {
        users::table
            .filter(users::email.eq(email))
            .filter(users::password_reset_token.eq(token_hash))
            .filter(users::password_reset_expires.gt(now))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    /// Stores the new hash and clears any outstanding reset token.
    pub fn reset_password(
        conn: &mut PgConnection,
        user_id: Uuid,
        password_hash: &str,
    ) -> QueryResult<usize> {
        diesel::update(users::table.find(user_id))
            .set((
                users::password_hash.eq(password_hash),
                users::password_reset_token.eq(None::<String>),
                users::password_reset_expires.eq(None::<DateTime<Utc>>),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    pub fn delete_by_id(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<usize> {
        diesel::delete(users::table.find(user_id)).execute(conn)
    }
}
