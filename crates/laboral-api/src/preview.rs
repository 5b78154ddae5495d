//! Handler for `POST /preview`.
//!
//! Parses OCR text into deduplicated candidates without touching the store.
//! Body: `{"text": "...", "fallback_year": 2026}` (`fallback_year` optional).

use axum::{Json, extract::rejection::JsonRejection};
use laboral_ocr::{ParseOptions, Preview, preview};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PreviewBody {
  pub text:          String,
  pub fallback_year: Option<i32>,
}

/// `POST /preview`
pub async fn handler(
  body: Result<Json<PreviewBody>, JsonRejection>,
) -> Result<Json<Preview>, ApiError> {
  let Json(body) = body?;
  let opts = ParseOptions { fallback_year: body.fallback_year };
  let p = preview(&body.text, &opts);
  tracing::info!(
    lines = p.lines_total,
    matched = p.lines_matched,
    candidates = p.candidates.len(),
    "preview parsed"
  );
  Ok(Json(p))
}
