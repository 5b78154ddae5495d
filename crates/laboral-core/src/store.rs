//! The `CalendarStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `laboral-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Coded,
  calendar::CalendarDay,
  import::{Import, ImportDetail, NewImport, RevertReport},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CalendarStore::list_imports`].
#[derive(Debug, Clone, Default)]
pub struct ImportQuery {
  pub empresa_id:       Option<Uuid>,
  /// Only imports confirmed from the document with this fingerprint.
  pub source_hash:      Option<String>,
  /// Reverted imports are listed unless this is `Some(false)`.
  pub include_reverted: Option<bool>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the import audit tables and the live ledger.
///
/// Confirm and revert are each a single all-or-nothing transaction. Import
/// items are append-only; ledger rows are never deleted.
pub trait CalendarStore: Send + Sync {
  type Error: std::error::Error + Coded + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist `input` as a new import: head, audit items and ledger upserts.
  ///
  /// Fails with `ImportConfirmFailed` and persists nothing if any step fails.
  fn confirm_import(
    &self,
    input: NewImport,
  ) -> impl Future<Output = Result<Import, Self::Error>> + Send + '_;

  /// Undo the ledger effect of an import on the dates it still owns.
  ///
  /// Fails with `ImportNotFound` or `ImportAlreadyReverted`. When the import is
  /// already reverted with the same `idempotency_key`, the stored report is
  /// returned with `replayed = true`.
  fn revert_import(
    &self,
    id: Uuid,
    idempotency_key: Option<String>,
  ) -> impl Future<Output = Result<RevertReport, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Import head plus all its items. `None` if not found.
  fn import_detail(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ImportDetail>, Self::Error>> + Send + '_;

  /// Import heads matching `query`, newest first.
  fn list_imports<'a>(
    &'a self,
    query: &'a ImportQuery,
  ) -> impl Future<Output = Result<Vec<Import>, Self::Error>> + Send + 'a;

  /// The ledger row for one date, if one was ever written.
  fn get_day(
    &self,
    empresa_id: Uuid,
    fecha: NaiveDate,
  ) -> impl Future<Output = Result<Option<CalendarDay>, Self::Error>> + Send + '_;

  /// Ledger rows for a company within an inclusive date range, by date.
  fn list_days(
    &self,
    empresa_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
  ) -> impl Future<Output = Result<Vec<CalendarDay>, Self::Error>> + Send + '_;
}
