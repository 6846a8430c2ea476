//! services/api/src/web/auth.rs
//!
//! Registration and login endpoints. Credentials never touch this service
//! beyond forwarding them to the identity provider.

use axum::{extract::State, http::StatusCode, response::Response, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

use achameupet_core::validate::RegistrationDraft;

use crate::web::envelope;
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub whatsapp: Option<String>,
    #[serde(rename = "fotoPerfil")]
    pub foto_perfil: Option<String>,
    pub cidade: Option<String>,
    pub bairro: Option<String>,
    #[serde(rename = "receberPropaganda")]
    pub receber_propaganda: Option<bool>,
    #[serde(rename = "tipoUsuario")]
    pub tipo_usuario: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(rename = "idToken")]
    pub id_token: Option<String>,
}

/// POST /api/auth/registro - create an identity and its profile
#[utoipa::path(
    post,
    path = "/api/auth/registro",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already in use"),
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let draft = RegistrationDraft {
        name: req.nome,
        email: req.email,
        password: req.senha,
        whatsapp: req.whatsapp,
        photo_url: req.foto_perfil,
        city: req.cidade,
        neighborhood: req.bairro,
        marketing_opt_in: req.receber_propaganda,
        kind: req.tipo_usuario,
    };

    match state.users.register(&draft).await {
        Ok(user) => envelope::created(user),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// POST /api/auth/login - verify a provider-issued token and load the profile
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token verified, profile returned"),
        (status = 400, description = "Token missing from the request"),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "No profile for this identity"),
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let Some(token) = req.id_token.as_deref().filter(|t| !t.is_empty()) else {
        return envelope::failure(
            StatusCode::BAD_REQUEST,
            json!("idToken is required"),
        );
    };

    match state.users.login(token).await {
        Ok((identity, user)) => envelope::ok(json!({
            "uid": identity.subject_id,
            "usuario": user,
        })),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}
