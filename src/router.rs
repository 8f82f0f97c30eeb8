use axum::{
    Router,
    routing::{get, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    middleware::{admin_auth, log_errors},
    routes,
};

// 管理接口，需要 ADMIN_TOKEN
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/count", put(routes::counter::set_count))
        .layer(axum::middleware::from_fn_with_state(state, admin_auth))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::counter::badge))
        .route("/badge.svg", get(routes::counter::badge))
        .route("/api/count", get(routes::counter::get_count))
        .route("/api/ping", get(routes::system::ping))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let router = public_routes().merge(admin_routes(state.clone())).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn(log_errors)),
    );

    // 开发模式下放开跨域，便于本地页面调用 JSON 接口
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
