//! # Application Error Handling
//!
//! [`Error`] is returned by controllers and boot code. It converts into an
//! HTTP response with a JSON body of the form
//! `{"error": "<kind>", "description": "<text>"}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::glossary::GlossaryError;

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub error: String,
    pub description: String,
}

impl ErrorDetail {
    #[must_use]
    pub fn new(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            description: description.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Unprocessable(String),

    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Glossary(#[from] GlossaryError),

    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),

    #[error(transparent)]
    QueryRejection(#[from] QueryRejection),

    #[error(transparent)]
    PathRejection(#[from] PathRejection),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),

    #[error(transparent)]
    Tera(#[from] tera::Error),
}

impl Error {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            Self::NotFound
            | Self::Glossary(GlossaryError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("not_found", "no such term"),
            ),
            Self::Unprocessable(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("validation_error", message.as_str()),
            ),
            Self::Validation(errors) | Self::Glossary(GlossaryError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("validation_error", errors.to_string()),
            ),
            Self::Glossary(err @ GlossaryError::Conflict { .. }) => (
                StatusCode::CONFLICT,
                ErrorDetail::new("conflict", err.to_string()),
            ),
            Self::JsonRejection(rejection) => (
                rejection.status(),
                ErrorDetail::new("invalid_body", rejection.body_text()),
            ),
            Self::QueryRejection(rejection) => (
                rejection.status(),
                ErrorDetail::new("invalid_query", rejection.body_text()),
            ),
            Self::PathRejection(rejection) => (
                rejection.status(),
                ErrorDetail::new("invalid_path", rejection.body_text()),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("internal_server_error", "Internal Server Error"),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(err.msg = %self, err.detail = ?self, "controller_error");
        } else {
            tracing::debug!(err.msg = %self, status = status.as_u16(), "request_rejected");
        }
        (status, Json(detail)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rstest::rstest;
    use validator::Validate;

    use super::Error;
    use crate::glossary::{GlossaryError, TermId, TermInput};

    fn validation_error() -> Error {
        Error::Validation(
            TermInput::new("", "definition")
                .validate()
                .expect_err("invalid input"),
        )
    }

    #[rstest]
    #[case(Error::NotFound, StatusCode::NOT_FOUND)]
    #[case(
        Error::Glossary(GlossaryError::NotFound { id: TermId::new("x") }),
        StatusCode::NOT_FOUND
    )]
    #[case(
        Error::Glossary(GlossaryError::Conflict { id: TermId::new("x"), existing: "X".to_string() }),
        StatusCode::CONFLICT
    )]
    #[case(validation_error(), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(
        Error::Glossary(GlossaryError::Io {
            path: "glossary.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn maps_errors_to_status(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(error.into_response().status(), status);
    }
}
