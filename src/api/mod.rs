//! HTTP layer: router construction and shared state
//!
//! Builds the axum router over the service, with CORS for the configured
//! frontend origin and per-request tracing. Handlers live in
//! `handlers`; the response envelope in `response`.

pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ConfigError};
use crate::service::HabitService;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HabitService>,
    pub config: AppConfig,
}

/// Build the application router.
///
/// Fails only when the configured frontend origin is not a valid header
/// value; that is a configuration error and should halt startup.
pub fn router(state: AppState) -> Result<Router, ConfigError> {
    let origin = state
        .config
        .frontend_origin
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidFrontendOrigin(state.config.frontend_origin.clone()))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::api_info))
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route("/api/habits/stats/statistics", get(handlers::statistics))
        .route("/api/habits/history", get(handlers::history))
        .route("/api/habits/summary", get(handlers::summary))
        .route("/api/habits/list", get(handlers::id_names))
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .put(handlers::update_habit)
                .delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", patch(handlers::toggle_habit))
        .route("/api/habits/:id/complete", patch(handlers::complete_habit))
        .route("/api/habits/:id/uncomplete", patch(handlers::uncomplete_habit))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}
