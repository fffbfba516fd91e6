use std::path::Path;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    routing::{any, get, post},
    Json, Router,
};
use common::types::{Health, Version};
use models::{Client, Company, Ink, Invoice, Order, Payroll, Product, Supplier};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::ApiError;
use crate::state::AppState;

pub mod auth;
pub mod files;
pub mod meta;
pub mod resources;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn version() -> Json<Version> {
    Json(Version { name: common::APP_NAME, version: env!("CARGO_PKG_VERSION") })
}

/// Unknown paths under `/api` get a JSON 404 instead of the frontend.
async fn api_not_found(uri: Uri) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", format!("no route for {}", uri.path()))
}

/// Session-protected `/api` routes: one CRUD set per resource plus files.
fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(resources::routes::<Company>())
        .merge(resources::routes::<Client>())
        .merge(resources::routes::<Product>())
        .merge(resources::routes::<Ink>())
        .merge(resources::routes::<Payroll>())
        .merge(resources::routes::<Supplier>())
        .merge(resources::routes::<Order>())
        .merge(resources::routes::<Invoice>())
        .merge(files::routes(max_upload_bytes))
        .route("/api", any(api_not_found))
        .route("/api/*rest", any(api_not_found))
}

/// Build the full application router, including public, auth, and protected API routes
pub fn build_router(state: AppState, frontend_dir: &str, max_upload_bytes: usize, cors: CorsLayer) -> Router {
    let index = Path::new(frontend_dir).join("index.html");
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));

    let public = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/meta/schema", get(meta::schema))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let api = api_routes(max_upload_bytes).route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    public
        .merge(api)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
