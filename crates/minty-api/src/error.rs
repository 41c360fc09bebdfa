//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use minty_core::envelope::Envelope;
use thiserror::Error;

pub const MISSING_FIELDS: &str =
  "Please fill in all required fields (name, email, company)";
pub const INTERNAL: &str = "Internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request was understood but its content is unacceptable.
  #[error("{0}")]
  Validation(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<minty_core::Error> for ApiError {
  fn from(e: minty_core::Error) -> Self {
    match e {
      minty_core::Error::MissingField(_) => {
        ApiError::Validation(MISSING_FIELDS.to_owned())
      }
      other => ApiError::Internal(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(m) => {
        (StatusCode::BAD_REQUEST, Envelope::failure(m.clone()))
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Envelope::failure(m.clone())),
      ApiError::MethodNotAllowed => (
        StatusCode::METHOD_NOT_ALLOWED,
        Envelope::failure("Method not allowed"),
      ),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        let mut body = Envelope::failure(INTERNAL);
        body.error = Some(e.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, body)
      }
    };
    (status, Json(body)).into_response()
  }
}
