use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::{error_codes, error_to_api_response};

/// 计数存储错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 网络或文件系统故障、非 2xx 响应、响应体格式错误
    #[error("存储后端不可用: {0}")]
    BackendUnavailable(String),
    /// 本地计数文件无法解析
    #[error("本地计数数据已损坏: {0}")]
    CorruptState(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::BackendUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::BackendUnavailable(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::BackendUnavailable(e.to_string())
    }
}

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    AdminDisabled,
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "未授权访问".to_string(),
            ),
            AppError::AdminDisabled => (
                StatusCode::FORBIDDEN,
                error_codes::PERMISSION_DENIED,
                "未配置管理令牌，接口已禁用".to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("Counter store failure: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    error_codes::STORE_UNAVAILABLE,
                    e.to_string(),
                )
            }
        };

        (status, error_to_api_response::<()>(code, error_message)).into_response()
    }
}
