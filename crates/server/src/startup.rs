use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server.host/port: {e}")))
}

/// Connect the configured backend and build the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.server.frontend_dir, &cfg.server.data_dir).await?;
    let backends = runtime::connect(&cfg.backend, &cfg.server.data_dir).await?;
    let state = AppState::new(backends, cfg.tables.clone());
    Ok(routes::build_router(state, &cfg.server.frontend_dir, cfg.server.max_upload_bytes, build_cors()))
}

/// Serve `cfg` until the listener fails.
pub async fn serve(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, backend = ?cfg.backend.kind, "listening");
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}

/// Public entry: load `.env` and config, then run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_default()?;
    serve(cfg).await?;
    Ok(())
}
