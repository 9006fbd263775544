//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the public submission endpoints used by the marketing
//! site and the admin endpoints used by the dashboard under a single Axum
//! router. The site is served from another origin, so CORS is open.

pub mod admin;
pub mod submissions;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, patch, post};
use leads::CatalogResponse;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full HTTP surface of the lead server.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/inquiries", post(submissions::create_inquiry).get(admin::list_inquiries))
        .route(
            "/api/sample-requests",
            post(submissions::create_sample_request).get(admin::list_sample_requests),
        )
        .route("/api/inquiries/{id}/status", patch(admin::update_status))
        .route("/api/analytics", get(admin::analytics))
        .route("/api/catalog", get(catalog))
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `GET /api/catalog`: the option lists the forms render and the server
/// validates against.
async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse::current())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
