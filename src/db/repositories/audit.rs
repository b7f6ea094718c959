use diesel::prelude::*;

use crate::db::models::audit::{AuditLog, NewAuditLog};
use crate::schema::audit_logs;

pub struct AuditRepo;

impl AuditRepo {
    pub fn insert(conn: &mut PgConnection, entry: &NewAuditLog) -> QueryResult<AuditLog> {
        diesel::insert_into(audit_logs::table)
            .values(entry)
            .returning(AuditLog::as_returning())
            .get_result(conn)
    }

    pub fn list_recent(conn: &mut PgConnection, limit: i64) -> QueryResult<Vec<AuditLog>> {
        audit_logs::table
            .order(audit_logs::created_at.desc())
            .limit(limit)
            .select(AuditLog::as_select())
            .load(conn)
    }
}
