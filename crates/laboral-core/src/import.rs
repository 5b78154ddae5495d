//! Imports: confirmed, audited batches of calendar entries.
//!
//! An import moves through `DRAFT` (the preview, which is never stored) to
//! `CONFIRMED` when its head row is written, and finally to `REVERTED`. Its
//! items are an append-only audit trail; reverting never touches them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  calendar::{EntryType, Scope},
  candidate::{CalendarEntryCandidate, CandidateMeta},
};

// ─── Origin ──────────────────────────────────────────────────────────────────

/// Where the entries of an import came from.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Origin {
  Ocr,
  Manual,
  Mixto,
}

impl Origin {
  /// Derive the origin from which kinds of entries a batch contains.
  pub fn infer(has_parsed: bool, has_manual: bool) -> Self {
    match (has_parsed, has_manual) {
      (true, true) => Self::Mixto,
      (false, true) => Self::Manual,
      _ => Self::Ocr,
    }
  }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Aggregate counts stored on the import head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
  pub total:    u32,
  pub activos:  u32,
  pub festivos: u32,
}

impl ImportStats {
  pub fn from_items(items: &[CalendarEntryCandidate]) -> Self {
    items.iter().fold(Self::default(), |mut s, c| {
      s.total += 1;
      if c.activo {
        s.activos += 1;
        if c.tipo == EntryType::FestivoLocal {
          s.festivos += 1;
        }
      }
      s
    })
  }
}

// ─── Head and items ──────────────────────────────────────────────────────────

/// The head row of a confirmed import. Only `reverted_at` ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
  pub id:                Uuid,
  pub empresa_id:        Uuid,
  pub created_at:        DateTime<Utc>,
  pub origen:            Origin,
  pub creado_por:        String,
  pub creado_por_nombre: Option<String>,
  /// Fingerprint of the OCR document, when the batch came from one.
  pub source_hash:       Option<String>,
  pub stats:             ImportStats,
  pub reverted_at:       Option<DateTime<Utc>>,
}

/// One immutable audit row: a full snapshot of a persisted candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportItem {
  pub item_id:      Uuid,
  pub import_id:    Uuid,
  pub fecha:        NaiveDate,
  pub tipo:         EntryType,
  pub subtipo:      Option<Scope>,
  pub descripcion:  String,
  pub es_laborable: bool,
  pub activo:       bool,
  pub meta:         CandidateMeta,
}

impl ImportItem {
  pub fn from_candidate(import_id: Uuid, c: CalendarEntryCandidate) -> Self {
    Self {
      item_id: Uuid::new_v4(),
      import_id,
      fecha: c.fecha,
      tipo: c.tipo,
      subtipo: c.subtipo,
      descripcion: c.descripcion,
      es_laborable: c.es_laborable,
      activo: c.activo,
      meta: c.meta,
    }
  }
}

/// Head plus items, as returned by the detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDetail {
  pub import: Import,
  pub items:  Vec<ImportItem>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CalendarStore::confirm_import`].
///
/// `items` must already be deduplicated; `id`, `created_at` and `stats` are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewImport {
  pub empresa_id:        Uuid,
  pub origen:            Origin,
  pub creado_por:        String,
  pub creado_por_nombre: Option<String>,
  pub source_hash:       Option<String>,
  pub items:             Vec<CalendarEntryCandidate>,
}

// ─── Revert ──────────────────────────────────────────────────────────────────

/// A date the revert left alone because a newer import owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDay {
  pub fecha: NaiveDate,
  pub owner: Uuid,
}

/// What a revert did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertReport {
  pub import_id:   Uuid,
  pub reverted_at: DateTime<Utc>,
  pub restored:    Vec<NaiveDate>,
  pub skipped:     Vec<SkippedDay>,
  /// `true` when this report was replayed for a repeated idempotency key.
  #[serde(default)]
  pub replayed:    bool,
}
