//! services/api/src/web/mod.rs
//!
//! The axum web layer: handlers, auth middleware, response envelope, and the
//! master OpenAPI definition.

pub mod alerts;
pub mod auth;
pub mod board;
pub mod envelope;
pub mod listings;
pub mod middleware;
pub mod state;

use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde_json::json;
use utoipa::OpenApi;

pub use middleware::require_auth;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        listings::create_listing_handler,
        listings::nearby_listings_handler,
        listings::my_listings_handler,
        listings::get_listing_handler,
        listings::update_listing_handler,
        listings::delete_listing_handler,
        board::post_board_handler,
        board::list_board_handler,
        alerts::create_alert_handler,
        alerts::list_alerts_handler,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        board::BoardPostRequest,
        alerts::AlertRequest,
    )),
    tags(
        (name = "AchaMeuPet API", description = "Lost-and-found pet platform backend.")
    )
)]
pub struct ApiDoc;

/// GET /api/health - liveness probe, no envelope.
pub async fn health_handler() -> Response {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "service": "AchaMeuPet Backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}
