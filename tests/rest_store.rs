use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use visit_badge::{
    config::StoreConfig,
    error::StoreError,
    store::{CounterStore, RestStore},
};

const TOKEN: &str = "test-token";

type Db = Arc<Mutex<HashMap<String, String>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

// 缺失的键返回 404，存在时放在 result 字段
async fn get_value(State(db): State<Db>, Path(key): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match db.lock().unwrap().get(&key) {
        Some(value) => Json(json!({ "result": value })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn set_value(
    State(db): State<Db>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    db.lock().unwrap().insert(key, body);
    Json(json!({ "result": "OK" })).into_response()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_kv() -> (SocketAddr, Db) {
    let db: Db = Arc::default();
    let app = Router::new()
        .route("/get/{key}", get(get_value))
        .route("/set/{key}", post(set_value))
        .with_state(db.clone());
    (serve(app).await, db)
}

fn store_for(addr: SocketAddr, token: &str) -> RestStore {
    RestStore::new(
        reqwest::Client::new(),
        &StoreConfig {
            url: format!("http://{addr}"),
            token: token.to_string(),
        },
        "visits",
    )
}

#[tokio::test]
async fn absent_key_reads_as_zero() {
    let (addr, _) = start_kv().await;
    assert_eq!(store_for(addr, TOKEN).get_count().await.unwrap(), 0);
}

#[tokio::test]
async fn set_then_get_round_trips() {
    let (addr, db) = start_kv().await;
    let store = store_for(addr, TOKEN);

    for n in [0, 7, 1_000_000] {
        store.set_count(n).await.unwrap();
        assert_eq!(store.get_count().await.unwrap(), n);
    }
    assert_eq!(db.lock().unwrap().get("visits").unwrap(), "1000000");
}

#[tokio::test]
async fn increment_from_fresh_store() {
    let (addr, _) = start_kv().await;
    let store = store_for(addr, TOKEN);

    assert_eq!(store.increment().await.unwrap(), 1);
    assert_eq!(store.increment().await.unwrap(), 2);
    assert_eq!(store.increment().await.unwrap(), 3);
    assert_eq!(store.get_count().await.unwrap(), 3);
}

#[tokio::test]
async fn rejected_token_is_backend_unavailable() {
    let (addr, _) = start_kv().await;
    let store = store_for(addr, "wrong");

    assert!(matches!(
        store.get_count().await,
        Err(StoreError::BackendUnavailable(_))
    ));
    assert!(matches!(
        store.set_count(1).await,
        Err(StoreError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn value_field_and_null_result_are_understood() {
    let app = Router::new()
        .route("/get/visits", get(|| async { Json(json!({ "value": 12 })) }))
        .route("/get/empty", get(|| async { Json(json!({ "result": null })) }));
    let addr = serve(app).await;

    let config = StoreConfig {
        url: format!("http://{addr}"),
        token: TOKEN.to_string(),
    };
    let client = reqwest::Client::new();

    let store = RestStore::new(client.clone(), &config, "visits");
    assert_eq!(store.get_count().await.unwrap(), 12);

    let empty = RestStore::new(client, &config, "empty");
    assert_eq!(empty.get_count().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_body_is_backend_unavailable() {
    let app = Router::new()
        .route("/get/visits", get(|| async { "<html>oops</html>" }))
        .route("/get/text", get(|| async { Json(json!({ "result": "many" })) }));
    let addr = serve(app).await;

    let config = StoreConfig {
        url: format!("http://{addr}"),
        token: TOKEN.to_string(),
    };
    let client = reqwest::Client::new();

    let store = RestStore::new(client.clone(), &config, "visits");
    assert!(matches!(
        store.get_count().await,
        Err(StoreError::BackendUnavailable(_))
    ));

    let text = RestStore::new(client, &config, "text");
    assert!(matches!(
        text.get_count().await,
        Err(StoreError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_backend_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert!(matches!(
        store_for(addr, TOKEN).get_count().await,
        Err(StoreError::BackendUnavailable(_))
    ));
}
