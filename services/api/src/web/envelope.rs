//! services/api/src/web/envelope.rs
//!
//! The uniform response envelope: `{success, data|error, meta?}`, with the
//! HTTP status mirroring the outcome class.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use achameupet_core::ServiceError;

pub fn ok(data: impl Serialize) -> Response {
    success(StatusCode::OK, data)
}

pub fn created(data: impl Serialize) -> Response {
    success(StatusCode::CREATED, data)
}

pub fn ok_with_meta(data: impl Serialize, meta: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": data, "meta": meta })),
    )
        .into_response()
}

fn success(status: StatusCode, data: impl Serialize) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

/// `error` is either a message string or an array of validation messages.
pub fn failure(status: StatusCode, error: Value) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn failure_with_detail(status: StatusCode, message: &str, detail: Option<String>) -> Response {
    let mut body = json!({ "success": false, "error": message });
    if let Some(detail) = detail {
        body["details"] = json!(detail);
    }
    (status, Json(body)).into_response()
}

/// Maps the closed error taxonomy onto HTTP statuses. Internal detail is only
/// exposed in development mode; in production it goes to the logs alone.
pub fn service_error(dev_mode: bool, err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(errors) => failure(StatusCode::BAD_REQUEST, json!(errors)),
        ServiceError::Unauthorized(msg) => failure(StatusCode::UNAUTHORIZED, json!(msg)),
        ServiceError::Forbidden(msg) => failure(StatusCode::FORBIDDEN, json!(msg)),
        ServiceError::NotFound(detail) => {
            failure_with_detail(StatusCode::NOT_FOUND, "record not found", dev_mode.then_some(detail))
        }
        ServiceError::Conflict(msg) => failure(StatusCode::CONFLICT, json!(msg)),
        ServiceError::UploadFailure => failure(
            StatusCode::BAD_REQUEST,
            json!("no image was stored successfully"),
        ),
        ServiceError::Collaborator(detail) => {
            error!(error = %detail, "collaborator call failed");
            failure_with_detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error",
                dev_mode.then_some(detail),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_mirror_the_outcome_class() {
        let cases = [
            (
                ServiceError::Validation(vec!["nome is required".to_string()]),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Unauthorized("no token".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ServiceError::Forbidden("not yours".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::NotFound("animais/x".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Conflict("email".to_string()),
                StatusCode::CONFLICT,
            ),
            (ServiceError::UploadFailure, StatusCode::BAD_REQUEST),
            (
                ServiceError::Collaborator("store down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(service_error(false, err).status(), expected);
        }
    }

    #[test]
    fn success_envelopes_carry_their_status() {
        assert_eq!(ok(json!({"x": 1})).status(), StatusCode::OK);
        assert_eq!(created(json!({"x": 1})).status(), StatusCode::CREATED);
        assert_eq!(
            ok_with_meta(json!([]), json!({"total": 0})).status(),
            StatusCode::OK
        );
    }
}
