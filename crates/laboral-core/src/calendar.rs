//! Calendar vocabulary and the live working-day ledger.
//!
//! A [`CalendarDay`] is the single effective row for an `(empresa_id, fecha)`
//! pair. Rows are upserted by confirmed imports and restored by reverts; they
//! are never deleted. A row whose `tipo` is `None` means "no explicit entry",
//! which reads as an ordinary working day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Entry type ──────────────────────────────────────────────────────────────

/// What kind of calendar entry a date carries.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryType {
  /// Mandatory company-wide closure.
  CierreEmpresa,
  /// An additional working day on top of the normal schedule.
  LaborableExtra,
  /// Collective-agreement schedule adjustment; still a working day.
  Convenio,
  /// A holiday. National/regional/local nuance lives in [`Scope`].
  FestivoLocal,
}

impl EntryType {
  /// Tie-break rank used by the deduplicator; higher wins.
  pub fn rank(self) -> u8 {
    match self {
      Self::CierreEmpresa => 4,
      Self::FestivoLocal => 3,
      Self::LaborableExtra => 2,
      Self::Convenio => 1,
    }
  }

  /// Whether a date of this type counts as a working day unless overridden.
  pub fn default_laborable(self) -> bool {
    matches!(self, Self::LaborableExtra | Self::Convenio)
  }
}

// ─── Scope ───────────────────────────────────────────────────────────────────

/// The origin of an entry, kept as `subtipo` and as a bracket tag on the
/// description.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scope {
  Nacional,
  Autonomico,
  Local,
  Convenio,
}

impl Scope {
  /// The audit tag prefixed onto descriptions.
  pub fn tag(self) -> &'static str {
    match self {
      Self::Nacional => "[NACIONAL]",
      Self::Autonomico => "[AUTONÓMICO]",
      Self::Local => "[LOCAL]",
      Self::Convenio => "[CONVENIO]",
    }
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// The explicit state of a ledger row just before an import overwrote it.
///
/// `previous` links to the snapshot that row itself had displaced, so a chain
/// of overlapping imports keeps its whole history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySnapshot {
  pub es_laborable:     bool,
  pub tipo:             EntryType,
  pub nombre:           Option<String>,
  pub activo:           bool,
  pub owning_import_id: Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub previous:         Option<Box<DaySnapshot>>,
}

/// One row of the live ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
  pub empresa_id:       Uuid,
  pub fecha:            NaiveDate,
  pub es_laborable:     bool,
  /// `None` when the date has no explicit entry.
  pub tipo:             Option<EntryType>,
  pub nombre:           Option<String>,
  pub activo:           bool,
  /// The import that currently controls this date, if any.
  pub owning_import_id: Option<Uuid>,
  pub previous_value:   Option<DaySnapshot>,
  pub updated_at:       DateTime<Utc>,
}

impl CalendarDay {
  pub fn is_explicit(&self) -> bool { self.tipo.is_some() }

  /// Capture this row as the `previous_value` of an incoming write, or `None`
  /// when the row holds no explicit entry.
  pub fn snapshot(&self) -> Option<DaySnapshot> {
    let tipo = self.tipo?;
    Some(DaySnapshot {
      es_laborable: self.es_laborable,
      tipo,
      nombre: self.nombre.clone(),
      activo: self.activo,
      owning_import_id: self.owning_import_id,
      previous: self.previous_value.clone().map(Box::new),
    })
  }
}

/// Downstream lookup: is `day` a working day?
///
/// Dates without an explicit, active entry are working days.
pub fn is_working_day(day: Option<&CalendarDay>) -> bool {
  match day {
    Some(d) if d.is_explicit() && d.activo => d.es_laborable,
    _ => true,
  }
}
