use std::time::Instant;

use axum::{
    extract::{Json, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    admission::record_visit,
    badge::{render_badge, render_degraded},
    error::AppError,
    middleware::ClientId,
    store::CounterStore,
    utils::success_to_api_response,
};

use super::model::{CountResponse, SetCountRequest};

fn svg_response(svg: String) -> Response {
    let mut res = svg.into_response();
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("image/svg+xml; charset=utf-8"),
    );
    // 禁止 CDN 与图片代理缓存，每次嵌入都要回源
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    res
}

pub async fn badge(State(state): State<AppState>, ClientId(client): ClientId) -> Response {
    let label = &state.config.badge_label;

    match record_visit(
        state.store.as_ref(),
        &state.admission,
        &client,
        Instant::now(),
    )
    .await
    {
        Ok(visit) => svg_response(render_badge(
            label,
            &visit.count.to_string(),
            &state.config.badge_color,
        )),
        Err(e) => {
            tracing::error!("Failed to record visit from {}: {}", client, e);
            svg_response(render_degraded(label))
        }
    }
}

pub async fn get_count(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let count = state.store.get_count().await?;

    Ok(success_to_api_response(CountResponse {
        count,
        durable_store: state.store.has_durable_store_configured(),
        backend: state.store.kind(),
    }))
}

pub async fn set_count(
    State(state): State<AppState>,
    Json(req): Json<SetCountRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.store.set_count(req.count).await?;
    tracing::info!("Counter overwritten with {}", req.count);

    Ok(success_to_api_response(CountResponse {
        count: req.count,
        durable_store: state.store.has_durable_store_configured(),
        backend: state.store.kind(),
    }))
}
