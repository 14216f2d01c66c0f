use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::db::KeyValueStore;
use crate::error::AppResult;

/// Namespaced Redis key for a stored value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey<'a>(pub &'a str);

impl Display for StorageKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "recipe-rank:{}", self.0)
    }
}

/// Creates a Redis client for preference storage
///
/// The client is cheap to clone; connections are opened per operation over
/// the multiplexed async connection.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed store
///
/// Values have no TTL: the profile lives until it is cleared.
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
}

impl RedisStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(StorageKey(key).to_string()).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis get failed");
            e
        })?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(StorageKey(key).to_string(), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(StorageKey(key).to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_display() {
        assert_eq!(
            StorageKey("userPreferences").to_string(),
            "recipe-rank:userPreferences"
        );
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(create_redis_client("not-a-url").is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn test_round_trip_against_redis() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let store = RedisStore::new(create_redis_client(&redis_url).unwrap());
        let key = "test_round_trip_prefs";

        store.set(key, r#"{"basil":2}"#).await.unwrap();
        assert_eq!(store.get(key).await.unwrap().as_deref(), Some(r#"{"basil":2}"#));

        store.remove(key).await.unwrap();
        assert_eq!(store.get(key).await.unwrap(), None);
    }
}
