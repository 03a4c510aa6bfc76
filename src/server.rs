//! HTTPサーバー
//!
//! APIルートと静的ファイル配信（public_dir、`/` は index.html）。

use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::handlers;

/// ハンドラ間で共有する状態
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_files =
        ServeDir::new(&state.config.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route(
            "/api/ai_hints",
            post(handlers::ai_hints).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate_prompt",
            post(handlers::generate_prompt).fallback(handlers::method_not_allowed),
        )
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// サーバーを起動（Ctrl+C で終了）
pub async fn serve(config: Config) -> Result<()> {
    if config.api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; API endpoints will answer 500");
    }
    if !config.public_dir.is_dir() {
        tracing::warn!(dir = %config.public_dir.display(), "public directory not found");
    }

    let bind = config.bind.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
