//! Handlers for `/imports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/imports` | Confirm a reviewed batch; 201 + import head |
//! | `GET`  | `/imports` | `?empresa_id&source_hash&include_reverted&limit&offset`, newest first |
//! | `GET`  | `/imports/{id}` | Head plus items; 404 if not found |
//! | `POST` | `/imports/{id}/revert` | Optional `Idempotency-Key` header |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use laboral_core::{
  candidate::{CalendarEntryCandidate, ManualEntry},
  import::{Import, ImportDetail, NewImport, Origin, RevertReport},
  store::{CalendarStore, ImportQuery},
};
use laboral_ocr::dedupe;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the client's idempotency key for reverts.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";

// ─── Confirm ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConfirmBody {
  pub empresa_id:        Uuid,
  /// Inferred from `items` and `manual` when absent.
  pub origen:            Option<Origin>,
  pub creado_por:        String,
  pub creado_por_nombre: Option<String>,
  pub source_hash:       Option<String>,
  /// Reviewed candidates from a preview.
  #[serde(default)]
  pub items:             Vec<CalendarEntryCandidate>,
  /// Entries typed in by the reviewer.
  #[serde(default)]
  pub manual:            Vec<ManualEntry>,
}

impl ConfirmBody {
  /// Validate and merge the body into a store input.
  fn into_new_import(self) -> Result<NewImport, ApiError> {
    if self.creado_por.trim().is_empty() {
      return Err(ApiError::BadRequest("creado_por must not be empty".into()));
    }
    if self.items.is_empty() && self.manual.is_empty() {
      return Err(ApiError::BadRequest("an import needs at least one item".into()));
    }
    if let Some(c) = self
      .items
      .iter()
      .find(|c| !(c.meta.confidence > 0.0 && c.meta.confidence <= 1.0))
    {
      return Err(ApiError::BadRequest(format!(
        "confidence for {} must be in (0, 1], got {}",
        c.fecha, c.meta.confidence
      )));
    }

    let origen = self
      .origen
      .unwrap_or_else(|| Origin::infer(!self.items.is_empty(), !self.manual.is_empty()));
    let items = dedupe(
      self
        .items
        .into_iter()
        .chain(self.manual.into_iter().map(CalendarEntryCandidate::from)),
    );

    Ok(NewImport {
      empresa_id: self.empresa_id,
      origen,
      creado_por: self.creado_por,
      creado_por_nombre: self.creado_por_nombre,
      source_hash: self.source_hash,
      items,
    })
  }
}

/// `POST /imports`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<ConfirmBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CalendarStore,
{
  let Json(body) = body?;
  let input = body.into_new_import()?;
  let import = store.confirm_import(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(import)))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub empresa_id:       Option<Uuid>,
  pub source_hash:      Option<String>,
  pub include_reverted: Option<bool>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

impl From<ListParams> for ImportQuery {
  fn from(p: ListParams) -> Self {
    Self {
      empresa_id:       p.empresa_id,
      source_hash:      p.source_hash,
      include_reverted: p.include_reverted,
      limit:            p.limit,
      offset:           p.offset,
    }
  }
}

/// `GET /imports`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Import>>, ApiError>
where
  S: CalendarStore,
{
  let Query(params) = params?;
  let query = ImportQuery::from(params);
  let imports = store.list_imports(&query).await.map_err(ApiError::store)?;
  Ok(Json(imports))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /imports/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ImportDetail>, ApiError>
where
  S: CalendarStore,
{
  let Path(id) = id?;
  let detail = store
    .import_detail(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ImportNotFound(id))?;
  Ok(Json(detail))
}

// ─── Revert ──────────────────────────────────────────────────────────────────

/// `POST /imports/{id}/revert`
pub async fn revert<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  headers: HeaderMap,
) -> Result<Json<RevertReport>, ApiError>
where
  S: CalendarStore,
{
  let Path(id) = id?;
  let key = headers
    .get(IDEMPOTENCY_KEY)
    .map(|v| {
      v.to_str()
        .map(str::to_owned)
        .map_err(|_| ApiError::BadRequest("Idempotency-Key must be visible ASCII".into()))
    })
    .transpose()?;

  let report = store.revert_import(id, key).await.map_err(ApiError::store)?;
  Ok(Json(report))
}
