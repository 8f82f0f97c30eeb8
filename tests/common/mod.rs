#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use tower::ServiceExt;
use visit_badge::{AppState, config::Config, store::CounterBackend};

pub fn temp_counter_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("visit-badge-it-{}", uuid::Uuid::new_v4()))
        .join("count.json")
}

pub fn config_with(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

/// 使用本地文件后端的应用状态
pub fn file_state(counter_file: &PathBuf, extra: &[(&str, &str)]) -> AppState {
    let path = counter_file.display().to_string();
    let mut pairs = vec![("COUNTER_FILE", path.as_str())];
    pairs.extend_from_slice(extra);
    let config = config_with(&pairs);
    let store = CounterBackend::from_config(&config).unwrap();
    AppState::new(config, store)
}

pub async fn send(app: &Router, req: Request<Body>) -> (Response<()>, String) {
    let res = app.clone().oneshot(req).await.unwrap();
    let (parts, body) = res.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    (
        Response::from_parts(parts, ()),
        String::from_utf8(bytes.to_vec()).unwrap(),
    )
}

pub fn badge_request(ip: &str) -> Request<Body> {
    Request::builder()
        .uri("/badge.svg")
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}
