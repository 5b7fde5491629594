//! HTTP API server

use axum::{
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/planets",
            get(handlers::list_planets).post(handlers::create_planet),
        )
        .route("/planets/", delete(handlers::remove_planet))
        .route("/planets/:id", delete(handlers::remove_planet))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}
