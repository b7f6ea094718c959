pub mod enums;
pub mod models;
pub mod repositories;

use diesel::PgConnection;
use diesel::r2d2::{self, ConnectionManager as DbConnectionManager};

pub type DbPool = r2d2::Pool<DbConnectionManager<PgConnection>>;
pub type DbConn = r2d2::PooledConnection<DbConnectionManager<PgConnection>>;
