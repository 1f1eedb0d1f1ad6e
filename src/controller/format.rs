//! Response helpers used by controllers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::Result;

/// Responds with `200 OK` and `item` as JSON.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps handler bodies uniform.
pub fn json<T: Serialize>(item: T) -> Result<Response> {
    Ok(Json(item).into_response())
}

/// Responds with `201 Created` and `item` as JSON.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps handler bodies uniform.
pub fn created<T: Serialize>(item: T) -> Result<Response> {
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// Responds with `204 No Content`.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps handler bodies uniform.
pub fn no_content() -> Result<Response> {
    Ok(StatusCode::NO_CONTENT.into_response())
}
