//! Handlers for the live ledger.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/calendar/{empresa_id}` | Optional `?from=YYYY-MM-DD&to=YYYY-MM-DD`, inclusive |
//! | `GET`  | `/calendar/{empresa_id}/{fecha}` | Working-day answer plus the ledger row, if any |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use chrono::NaiveDate;
use laboral_core::{
  calendar::{CalendarDay, is_working_day},
  store::CalendarStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RangeParams {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

/// `GET /calendar/{empresa_id}`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  empresa_id: Result<Path<Uuid>, PathRejection>,
  params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<CalendarDay>>, ApiError>
where
  S: CalendarStore,
{
  let Path(empresa_id) = empresa_id?;
  let Query(RangeParams { from, to }) = params?;
  if let (Some(f), Some(t)) = (from, to)
    && f > t
  {
    return Err(ApiError::BadRequest(format!("from {f} is after to {t}")));
  }

  let days = store
    .list_days(empresa_id, from, to)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(days))
}

// ─── Single date ─────────────────────────────────────────────────────────────

/// Answer to "is this date a working day?".
#[derive(Debug, Serialize, Deserialize)]
pub struct DayStatus {
  pub fecha:        NaiveDate,
  pub es_laborable: bool,
  /// The ledger row behind the answer; absent for never-touched dates.
  pub day:          Option<CalendarDay>,
}

/// `GET /calendar/{empresa_id}/{fecha}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<(Uuid, NaiveDate)>, PathRejection>,
) -> Result<Json<DayStatus>, ApiError>
where
  S: CalendarStore,
{
  let Path((empresa_id, fecha)) = path?;
  let day = store
    .get_day(empresa_id, fecha)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(DayStatus {
    fecha,
    es_laborable: is_working_day(day.as_ref()),
    day,
  }))
}
