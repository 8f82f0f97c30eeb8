use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use subtle::ConstantTimeEq;

use crate::{AppState, error::AppError};

/// 管理接口鉴权，未配置 ADMIN_TOKEN 时接口关闭
pub async fn admin_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Err(AppError::AdminDisabled);
    };

    match req.headers().typed_get::<Authorization<Bearer>>() {
        Some(auth) if token_matches(auth.token(), expected) => Ok(next.run(req).await),
        _ => {
            tracing::warn!("Rejected admin request to {}", req.uri().path());
            Err(AppError::Unauthorized)
        }
    }
}

// 按常量时间比较，长度不同直接视为不匹配
fn token_matches(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}
