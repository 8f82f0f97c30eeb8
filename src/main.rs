use std::net::{IpAddr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visit_badge::{
    AppState, admission::sweeper, config::Config, router::create_router, store::CounterBackend,
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();

    // 选择计数后端
    let store = CounterBackend::from_config(&config).expect("Failed to open counter store");
    if !store.has_durable_store_configured() {
        tracing::warn!(
            "No durable store configured, counting into local file {}",
            config.counter_file
        );
    }

    let state = AppState::new(config, store);

    // 定期清理准入记录
    tokio::spawn(sweeper(state.admission.clone()));

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!(
        "Admission window: {} seconds",
        state.config.admission_window_secs
    );

    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
