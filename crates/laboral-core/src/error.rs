//! Error types for `laboral-core`.
//!
//! Every error that can reach a client carries a stable [`ErrorCode`]. Backends
//! expose theirs through the [`Coded`] trait so higher layers can render a
//! structured `{code, message}` without knowing the backend's error type.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("import not found: {0}")]
  ImportNotFound(Uuid),

  #[error("import {0} is already reverted")]
  ImportAlreadyReverted(Uuid),

  #[error("import could not be confirmed: {cause}")]
  ImportConfirmFailed { cause: String },

  #[error("invalid input: {0}")]
  InvalidInput(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stable, client-facing error discriminant.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  strum::Display,
  strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
  ImportNotFound,
  ImportAlreadyReverted,
  ImportConfirmFailed,
  InvalidInput,
  Internal,
}

/// Implemented by every error type that may surface through the API.
pub trait Coded {
  fn code(&self) -> ErrorCode;
}

impl Coded for Error {
  fn code(&self) -> ErrorCode {
    match self {
      Self::ImportNotFound(_) => ErrorCode::ImportNotFound,
      Self::ImportAlreadyReverted(_) => ErrorCode::ImportAlreadyReverted,
      Self::ImportConfirmFailed { .. } => ErrorCode::ImportConfirmFailed,
      Self::InvalidInput(_) => ErrorCode::InvalidInput,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_render_screaming_snake_case() {
    assert_eq!(ErrorCode::ImportAlreadyReverted.to_string(), "IMPORT_ALREADY_REVERTED");
    assert_eq!(ErrorCode::ImportNotFound.as_ref(), "IMPORT_NOT_FOUND");
    assert_eq!(
      serde_json::to_value(ErrorCode::ImportConfirmFailed).unwrap(),
      serde_json::json!("IMPORT_CONFIRM_FAILED")
    );
  }

  #[test]
  fn errors_map_to_their_codes() {
    let id = Uuid::new_v4();
    assert_eq!(Error::ImportNotFound(id).code(), ErrorCode::ImportNotFound);
    assert_eq!(
      Error::ImportConfirmFailed { cause: "x".into() }.code(),
      ErrorCode::ImportConfirmFailed
    );
  }
}
