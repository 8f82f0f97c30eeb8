use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

use super::CounterStore;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// 通过 REST 协议访问的持久化存储
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    endpoint: String,
    token: String,
    key: String,
}

// GET 响应体，值位于 result 或 value 字段
#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
}

impl RestStore {
    pub fn new(client: Client, store: &StoreConfig, key: &str) -> Self {
        Self {
            client,
            endpoint: store.url.trim_end_matches('/').to_string(),
            token: store.token.clone(),
            key: key.to_string(),
        }
    }

    fn url(&self, command: &str) -> String {
        format!("{}/{}/{}", self.endpoint, command, self.key)
    }
}

impl CounterStore for RestStore {
    async fn get_count(&self) -> Result<u64, StoreError> {
        let url = self.url("get");
        let res = self.client.get(&url).bearer_auth(&self.token).send().await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        if !status.is_success() {
            return Err(StoreError::BackendUnavailable(format!(
                "GET {} returned {}",
                url, status
            )));
        }

        let body: GetResponse = res.json().await?;
        match body.result.or(body.value) {
            None | Some(Value::Null) => Ok(0),
            Some(value) => parse_count(&value).ok_or_else(|| {
                StoreError::BackendUnavailable(format!("GET {} returned malformed value {}", url, value))
            }),
        }
    }

    async fn set_count(&self, value: u64) -> Result<(), StoreError> {
        let url = self.url("set");
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .body(value.to_string())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(StoreError::BackendUnavailable(format!(
                "POST {} returned {}",
                url, status
            )));
        }
        Ok(())
    }
}

// 值可能是数字，也可能是数字字符串（含多一层 JSON 引号的情况）
fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().trim_matches('"').parse().ok(),
        _ => None,
    }
}
