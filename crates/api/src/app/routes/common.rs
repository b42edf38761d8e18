//! Extraction helpers shared by every module router.
//!
//! Handlers return [`HandlerResult`] so malformed input can short-circuit
//! with `?` into the error envelope.

use std::str::FromStr;

use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::Response;

use crate::app::errors;
use crate::app::use_cases::ServiceResult;

pub type HandlerResult = Result<Response, Response>;

pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, Response> {
    raw.parse().map_err(|_| errors::invalid_id(raw))
}

pub fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(inner)| inner).map_err(errors::json_rejection)
}

pub fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    query.map(|Query(inner)| inner).map_err(errors::query_rejection)
}

/// Turn a criteria conversion failure (bad page/limit) into a 400.
pub fn criteria<C>(criteria: Result<C, String>) -> Result<C, Response> {
    criteria.map_err(|msg| errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", msg))
}

pub fn service<T>(result: ServiceResult<T>) -> Result<T, Response> {
    result.map_err(errors::service_error_to_response)
}
