use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::app::use_cases::ServiceError;

/// Every failure leaves the API in the same envelope:
/// `{ "success": false, "error": <message>, "code": <machine code> }`.
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Storage(msg) => {
            error!(%msg, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Error interno del servidor",
            )
        }
    }
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}

pub fn invalid_id(id: &str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("Identificador inválido: {id}"))
}

/// `{ "success": true, "data": .., "message"?: .. }`
pub fn ok<T: Serialize>(status: StatusCode, data: T, message: Option<&str>) -> axum::response::Response {
    let mut body = json!({ "success": true, "data": data });
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    (status, axum::Json(body)).into_response()
}

/// `{ "success": true, "data": [..], "total": n }`
pub fn ok_page<T: Serialize>(items: Vec<T>, total: u64) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(json!({ "success": true, "data": items, "total": total })),
    )
        .into_response()
}

pub fn ok_message(message: &str) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(json!({ "success": true, "message": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_distinct_statuses() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(service_error_to_response(err).status(), status);
        }
    }
}
