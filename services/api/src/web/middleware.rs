//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use achameupet_core::domain::Caller;
use achameupet_core::ports::{AuthIdentity, PortError};

use crate::web::envelope;
use crate::web::state::AppState;

/// The verified caller, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub user_type: Option<String>,
}

impl AuthUser {
    fn from_identity(identity: AuthIdentity) -> Self {
        let user_type = identity
            .claims
            .get("tipoUsuario")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            id: identity.subject_id,
            name: identity.display_name,
            phone: identity.phone,
            user_type,
        }
    }

    pub fn caller(&self) -> Caller {
        Caller {
            id: self.id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Middleware that validates the bearer token and extracts the caller.
///
/// A missing or malformed header is rejected with 401; a token the identity
/// provider refuses is rejected with 403.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return envelope::failure(
            StatusCode::UNAUTHORIZED,
            json!("missing or malformed bearer token"),
        );
    };

    match state.identity.verify_token(token).await {
        Ok(identity) => {
            req.extensions_mut().insert(AuthUser::from_identity(identity));
            next.run(req).await
        }
        Err(PortError::InvalidToken(_)) => {
            envelope::failure(StatusCode::FORBIDDEN, json!("invalid or expired token"))
        }
        Err(err) => {
            error!(error = %err, "token verification failed");
            envelope::failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!("internal server error"),
            )
        }
    }
}
