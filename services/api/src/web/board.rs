//! services/api/src/web/board.rs
//!
//! Community board endpoints: anyone can read, posting requires auth.

use axum::{
    extract::{Query, State},
    response::Response,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use achameupet_core::community::BoardPostDraft;

use crate::web::envelope;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct BoardPostRequest {
    pub titulo: Option<String>,
    pub conteudo: Option<String>,
    pub visibilidade: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BoardListParams {
    #[serde(rename = "usuarioId")]
    pub usuario_id: Option<String>,
}

/// POST /api/mural - post a message
#[utoipa::path(
    post,
    path = "/api/mural",
    request_body = BoardPostRequest,
    responses(
        (status = 201, description = "Message posted"),
        (status = 400, description = "Missing title or body"),
        (status = 401, description = "Missing bearer token"),
    ),
    tag = "mural"
)]
pub async fn post_board_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BoardPostRequest>,
) -> Response {
    let draft = BoardPostDraft {
        title: req.titulo,
        body: req.conteudo,
        visibility: req.visibilidade,
    };

    match state.board.post(&user.caller(), &draft).await {
        Ok(post) => envelope::created(post),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}

/// GET /api/mural - list messages, newest first
#[utoipa::path(
    get,
    path = "/api/mural",
    params(("usuarioId" = Option<String>, Query, description = "Narrow to one author")),
    responses((status = 200, description = "Messages, newest first")),
    tag = "mural"
)]
pub async fn list_board_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoardListParams>,
) -> Response {
    match state.board.list(params.usuario_id.as_deref()).await {
        Ok(posts) => envelope::ok(posts),
        Err(err) => envelope::service_error(state.config.dev_mode, err),
    }
}
