pub mod user_cache;

pub use user_cache::UserCache;

use crate::error::AppError;

/// PING the cache server.
pub async fn redis_health_check(redis_client: &redis::Client) -> Result<bool, AppError> {
    let mut conn = redis_client.get_multiplexed_async_connection().await?;
    let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(pong == "PONG")
}
