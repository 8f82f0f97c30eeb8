// 计数存储
// 持久化 KV（Redis 客户端或 REST 协议）与本地 JSON 文件两种实现，启动时按配置选定

pub mod file;
pub mod redis_client;
pub mod rest;

use std::future::Future;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::StoreError;

pub use file::{CounterDocument, FileStore};
pub use redis_client::RedisStore;
pub use rest::RestStore;

/// 计数存储接口
pub trait CounterStore: Send + Sync {
    /// 读取当前计数，从未写入时为 0
    fn get_count(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// 覆盖写入计数
    fn set_count(&self, value: u64) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// 读取后加一写回，并发调用时可能丢失增量
    fn increment(&self) -> impl Future<Output = Result<u64, StoreError>> + Send {
        async move {
            let next = self.get_count().await?.saturating_add(1);
            self.set_count(next).await?;
            Ok(next)
        }
    }
}

/// 后端类型，用于诊断输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Redis,
    Rest,
    File,
}

/// 启动时选定的计数后端
pub enum CounterBackend {
    Redis(RedisStore),
    Rest(RestStore),
    File(FileStore),
}

impl CounterBackend {
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let backend = match &config.store {
            Some(store) if is_redis_url(&store.url) => {
                CounterBackend::Redis(RedisStore::open(store, &config.counter_key)?)
            }
            Some(store) => CounterBackend::Rest(RestStore::new(
                reqwest::Client::new(),
                store,
                &config.counter_key,
            )),
            None => CounterBackend::File(FileStore::new(PathBuf::from(&config.counter_file))),
        };

        tracing::info!("Counter backend selected: {:?}", backend.kind());
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            CounterBackend::Redis(_) => BackendKind::Redis,
            CounterBackend::Rest(_) => BackendKind::Rest,
            CounterBackend::File(_) => BackendKind::File,
        }
    }

    pub fn has_durable_store_configured(&self) -> bool {
        !matches!(self, CounterBackend::File(_))
    }
}

impl CounterStore for CounterBackend {
    async fn get_count(&self) -> Result<u64, StoreError> {
        match self {
            CounterBackend::Redis(store) => store.get_count().await,
            CounterBackend::Rest(store) => store.get_count().await,
            CounterBackend::File(store) => store.get_count().await,
        }
    }

    async fn set_count(&self, value: u64) -> Result<(), StoreError> {
        match self {
            CounterBackend::Redis(store) => store.set_count(value).await,
            CounterBackend::Rest(store) => store.set_count(value).await,
            CounterBackend::File(store) => store.set_count(value).await,
        }
    }
}

fn is_redis_url(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.starts_with("redis://") || url.starts_with("rediss://")
}
