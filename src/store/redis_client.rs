use redis::{AsyncCommands, Client as RedisClient, IntoConnectionInfo};

use super::CounterStore;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// 通过 Redis 客户端直连的持久化存储
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: RedisClient,
    key: String,
}

impl RedisStore {
    /// URL 中没有密码时使用访问令牌作为密码
    pub fn open(store: &StoreConfig, key: &str) -> Result<Self, StoreError> {
        let mut info = store.url.as_str().into_connection_info()?;
        if info.redis.password.is_none() {
            info.redis.password = Some(store.token.clone());
        }

        Ok(Self {
            client: RedisClient::open(info)?,
            key: key.to_string(),
        })
    }
}

impl CounterStore for RedisStore {
    async fn get_count(&self) -> Result<u64, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<u64> = conn.get(&self.key).await?;
        Ok(value.unwrap_or(0))
    }

    async fn set_count(&self, value: u64) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(&self.key, value.to_string()).await?;
        Ok(())
    }
}
