//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as `{"code": "...", "message": "..."}` with the HTTP
//! status derived from its [`ErrorCode`].

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use laboral_core::{Coded, ErrorCode};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("import not found: {0}")]
  ImportNotFound(Uuid),

  #[error("{0}")]
  BadRequest(String),

  #[error("{source}")]
  Store {
    code:   ErrorCode,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a store error, keeping its client-facing code.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Coded + Send + Sync + 'static,
  {
    Self::Store { code: e.code(), source: Box::new(e) }
  }
}

impl Coded for ApiError {
  fn code(&self) -> ErrorCode {
    match self {
      Self::ImportNotFound(_) => ErrorCode::ImportNotFound,
      Self::BadRequest(_) => ErrorCode::InvalidInput,
      Self::Store { code, .. } => *code,
    }
  }
}

/// HTTP status for a client-facing error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
  match code {
    ErrorCode::ImportNotFound => StatusCode::NOT_FOUND,
    ErrorCode::ImportAlreadyReverted => StatusCode::CONFLICT,
    ErrorCode::ImportConfirmFailed => StatusCode::UNPROCESSABLE_ENTITY,
    ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
    ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let code = self.code();
    let status = status_for(code);
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    // Internal failures are logged in full; clients only see the code.
    let message = match code {
      ErrorCode::Internal => "internal error".to_owned(),
      _ => self.to_string(),
    };
    (status, Json(json!({ "code": code, "message": message }))).into_response()
  }
}

// Extractor rejections share the same body shape as every other error.

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::BadRequest(r.body_text()) }
}
