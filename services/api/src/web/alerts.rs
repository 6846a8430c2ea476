//! services/api/src/web/alerts.rs
//!
//! Per-user alert endpoints.

use axum::{extract::State, response::Response, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use achameupet_core::community::AlertDraft;

use crate::web::envelope;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct AlertRequest {
    pub tipo: Option<String>,
    pub mensagem: Option<String>,
    #[serde(rename = "animalId")]
    pub animal_id: Option<String>,
}

/// POST /api/alertas - create an alert for the caller
#[utoipa::path(
    post,
    path = "/api/alertas",
    request_body = AlertRequest,
    responses(
        (status = 201, description = "Alert created"),
        (status = 400, description = "Missing or unknown alert type"),
        (status = 401, description = "Missing bearer token"),
    ),
    tag = "alertas"
)]
pub async fn create_alert_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AlertRequest>,
) -> Response {
    let draft = AlertDraft {
        kind: req.tipo,
        message: req.mensagem,
        listing_id: req.animal_id,
    };

    match state.alerts.create(&user.caller(), &draft).await {
        Ok(alert) => envelope::created(alert),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// GET /api/alertas - the caller's alerts, newest first
#[utoipa::path(
    get,
    path = "/api/alertas",
    responses(
        (status = 200, description = "The caller's alerts"),
        (status = 401, description = "Missing bearer token"),
    ),
    tag = "alertas"
)]
pub async fn list_alerts_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.alerts.list_for(&user.id).await {
        Ok(alerts) => envelope::ok(alerts),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}
