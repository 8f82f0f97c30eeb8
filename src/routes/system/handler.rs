use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{AppState, store::BackendKind, utils::success_to_api_response};

/// Ping响应
#[derive(Debug, Serialize)]
pub struct PingResponse {
    /// 服务状态
    pub status: String,
    /// 服务器时间
    pub timestamp: i64,
    /// 当前计数后端
    pub backend: BackendKind,
    /// 正在跟踪的客户端数
    pub tracked_clients: usize,
}

/// 健康检查接口
pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    success_to_api_response(PingResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        backend: state.store.kind(),
        tracked_clients: state.admission.tracked_clients(),
    })
}
