use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::CounterStore;
use crate::error::StoreError;

/// 本地计数文件内容
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CounterDocument {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 本地 JSON 文件存储，文件不存在视为计数 0
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    // 所有写入共用一个临时文件，必须串行
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read_document(&self) -> Result<Option<CounterDocument>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map(Some).map_err(|e| {
            StoreError::CorruptState(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl CounterStore for FileStore {
    async fn get_count(&self) -> Result<u64, StoreError> {
        Ok(self.read_document().await?.map(|doc| doc.count).unwrap_or(0))
    }

    async fn set_count(&self, value: u64) -> Result<(), StoreError> {
        let doc = CounterDocument {
            count: value,
            updated_at: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| StoreError::BackendUnavailable(format!("序列化错误: {}", e)))?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先写临时文件再改名，避免读到写了一半的内容
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
