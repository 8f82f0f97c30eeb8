use std::env;
use std::time::Duration;

/// 持久化存储的连接配置（地址 + 访问令牌）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub token: String,
}

// 按优先级排列的变量名：标准命名在前，旧命名在后
const STORE_VAR_PAIRS: [(&str, &str); 2] = [
    ("KV_REST_API_URL", "KV_REST_API_TOKEN"),
    ("UPSTASH_REDIS_REST_URL", "UPSTASH_REDIS_REST_TOKEN"),
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub admission_window_secs: u64,
    pub counter_key: String,
    pub counter_file: String,
    pub badge_label: String,
    pub badge_color: String,
    pub admin_token: Option<String>,
    pub store: Option<StoreConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 从任意键值来源解析配置，便于测试时不修改进程环境
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Config {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: var("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            admission_window_secs: var("ADMISSION_WINDOW")
                .and_then(|v| v.trim_end_matches('s').parse().ok())
                .unwrap_or(60),
            counter_key: var("COUNTER_KEY").unwrap_or_else(|| "visits".into()),
            counter_file: var("COUNTER_FILE").unwrap_or_else(|| "count.json".into()),
            badge_label: var("BADGE_LABEL").unwrap_or_else(|| "visits".into()),
            badge_color: var("BADGE_COLOR").unwrap_or_else(|| "#4c1".into()),
            admin_token: var("ADMIN_TOKEN"),
            store: detect_store(&var),
        }
    }

    pub fn admission_window(&self) -> Duration {
        Duration::from_secs(self.admission_window_secs)
    }
}

fn detect_store<F>(var: &F) -> Option<StoreConfig>
where
    F: Fn(&str) -> Option<String>,
{
    for (url_var, token_var) in STORE_VAR_PAIRS {
        match (var(url_var), var(token_var)) {
            (Some(url), Some(token)) => {
                return Some(StoreConfig {
                    url: url.trim().trim_end_matches('/').to_string(),
                    token: token.trim().to_string(),
                });
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "Ignoring incomplete store configuration: {} and {} must both be set",
                    url_var,
                    token_var
                );
            }
            (None, None) => {}
        }
    }
    None
}
