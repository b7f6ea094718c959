use redis::{AsyncCommands, RedisResult};
use uuid::Uuid;

use crate::db::models::user::AuthUser;
use crate::error::AppError;

const USER_CACHE_PREFIX: &str = "user:";

/// Seconds an authenticated user record stays cached.
pub const USER_CACHE_TTL: u64 = 3600;

pub fn user_key(user_id: Uuid) -> String {
    format!("{}{}", USER_CACHE_PREFIX, user_id)
}

/// Redis-backed cache of [`AuthUser`] records keyed by user id.
///
/// The strict methods return errors; `lookup`, `store` and `evict` swallow
/// them with a warning so a cache outage never fails a request.
#[derive(Clone)]
pub struct UserCache {
    redis_client: redis::Client,
}

impl UserCache {
    pub fn new(redis_client: redis::Client) -> Self {
        Self { redis_client }
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.redis_client
            .get_multiplexed_async_connection()
            .await
            .map_err(AppError::from)
    }

    pub async fn cache_user(&self, user: &AuthUser) -> Result<(), AppError> {
        let mut conn = self.get_connection().await?;
        let user_json = serde_json::to_string(user)
            .map_err(|e| AppError::Internal(format!("Failed to serialize user: {}", e)))?;

        let _: () = conn.set_ex(user_key(user.id), user_json, USER_CACHE_TTL).await?;
        Ok(())
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<AuthUser>, AppError> {
        let mut conn = self.get_connection().await?;
        let user_json: Option<String> = conn.get(user_key(user_id)).await?;

        match user_json {
            Some(json) => {
                let user = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Failed to deserialize user: {}", e))
                })?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub async fn invalidate_user_cache(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut conn = self.get_connection().await?;
        let _: RedisResult<i32> = conn.del(user_key(user_id)).await;
        Ok(())
    }

    pub async fn lookup(&self, user_id: Uuid) -> Option<AuthUser> {
        match self.get_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("User cache read failed for {}: {}", user_id, e);
                None
            }
        }
    }

    pub async fn store(&self, user: &AuthUser) {
        if let Err(e) = self.cache_user(user).await {
            tracing::warn!("User cache write failed for {}: {}", user.id, e);
        }
    }

    pub async fn evict(&self, user_id: Uuid) {
        if let Err(e) = self.invalidate_user_cache(user_id).await {
            tracing::warn!("User cache eviction failed for {}: {}", user_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_by_user_id() {
        let id = Uuid::nil();
        assert_eq!(user_key(id), "user:00000000-0000-0000-0000-000000000000");
    }

    #[tokio::test]
    async fn unreachable_server_degrades_to_miss() {
        let client = redis::Client::open("redis://127.0.0.1:1/").unwrap();
        let cache = UserCache::new(client);
        assert!(cache.lookup(Uuid::new_v4()).await.is_none());
        cache.evict(Uuid::new_v4()).await;
    }
}
