//! Candidates: provisional calendar entries produced by a parse pass.
//!
//! Candidates are never stored as such. They are shown in the preview, may be
//! edited by a reviewer, and become [`ImportItem`](crate::import::ImportItem)s
//! when an import is confirmed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{EntryType, Scope};

/// Reason recorded for entries that bypass the classifier.
pub const MANUAL_OVERRIDE_REASON: &str = "manual_override";

/// Provenance of a candidate: which rule produced it and from where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMeta {
  /// In `(0, 1]`.
  pub confidence:     f64,
  /// Identifier of the classifier rule that fired.
  pub reason:         String,
  pub source_line:    Option<String>,
  /// 1-based line number in the normalized document.
  pub line_no:        Option<usize>,
  pub detected_month: Option<u32>,
  pub detected_year:  Option<i32>,
  #[serde(default)]
  pub is_range:       bool,
}

/// A parsed, unconfirmed calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntryCandidate {
  pub fecha:        NaiveDate,
  pub tipo:         EntryType,
  #[serde(alias = "label")]
  pub subtipo:      Option<Scope>,
  /// Source line prefixed with the scope tag, e.g. `[NACIONAL] 17/04 ...`.
  pub descripcion:  String,
  pub es_laborable: bool,
  #[serde(default = "default_true")]
  pub activo:       bool,
  pub meta:         CandidateMeta,
}

fn default_true() -> bool { true }

impl CalendarEntryCandidate {
  /// The human label for `subtipo`, if any.
  pub fn label(&self) -> Option<&'static str> { self.subtipo.map(Into::into) }

  pub fn confidence(&self) -> f64 { self.meta.confidence }

  /// Whether `self` should replace `other` when both target the same date.
  ///
  /// Higher confidence wins; on equal confidence the higher-ranked type wins.
  /// A full tie keeps `other`.
  pub fn beats(&self, other: &Self) -> bool {
    match self.confidence().total_cmp(&other.confidence()) {
      std::cmp::Ordering::Greater => true,
      std::cmp::Ordering::Less => false,
      std::cmp::Ordering::Equal => self.tipo.rank() > other.tipo.rank(),
    }
  }
}

/// Prefix `line` with the tag of `scope`, if any.
pub fn annotate(scope: Option<Scope>, line: &str) -> String {
  match scope {
    Some(s) => format!("{} {line}", s.tag()),
    None => line.to_owned(),
  }
}

// ─── Manual override ─────────────────────────────────────────────────────────

/// A reviewer-entered date that skips classification entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntry {
  pub fecha:        NaiveDate,
  pub tipo:         EntryType,
  #[serde(default, alias = "label")]
  pub subtipo:      Option<Scope>,
  pub descripcion:  Option<String>,
  /// Defaults to [`EntryType::default_laborable`].
  pub es_laborable: Option<bool>,
  #[serde(default = "default_true")]
  pub activo:       bool,
}

impl From<ManualEntry> for CalendarEntryCandidate {
  fn from(e: ManualEntry) -> Self {
    let text = e.descripcion.unwrap_or_else(|| e.tipo.to_string());
    Self {
      fecha:        e.fecha,
      tipo:         e.tipo,
      subtipo:      e.subtipo,
      descripcion:  annotate(e.subtipo, &text),
      es_laborable: e.es_laborable.unwrap_or(e.tipo.default_laborable()),
      activo:       e.activo,
      meta:         CandidateMeta {
        confidence:     1.0,
        reason:         MANUAL_OVERRIDE_REASON.to_owned(),
        source_line:    None,
        line_no:        None,
        detected_month: None,
        detected_year:  None,
        is_range:       false,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate(tipo: EntryType, confidence: f64) -> CalendarEntryCandidate {
    CalendarEntryCandidate {
      fecha: NaiveDate::from_ymd_opt(2026, 4, 17).unwrap(),
      tipo,
      subtipo: None,
      descripcion: String::new(),
      es_laborable: tipo.default_laborable(),
      activo: true,
      meta: CandidateMeta {
        confidence,
        reason: "test".into(),
        source_line: None,
        line_no: None,
        detected_month: None,
        detected_year: None,
        is_range: false,
      },
    }
  }

  #[test]
  fn higher_confidence_beats_higher_rank() {
    let festivo = candidate(EntryType::FestivoLocal, 0.35);
    let convenio = candidate(EntryType::Convenio, 0.9);
    assert!(convenio.beats(&festivo));
    assert!(!festivo.beats(&convenio));
  }

  #[test]
  fn equal_confidence_falls_back_to_rank() {
    let festivo = candidate(EntryType::FestivoLocal, 0.9);
    let cierre = candidate(EntryType::CierreEmpresa, 0.9);
    assert!(cierre.beats(&festivo));
    assert!(!festivo.beats(&festivo.clone()));
  }

  #[test]
  fn manual_entry_bypasses_classifier() {
    let c: CalendarEntryCandidate = ManualEntry {
      fecha:        NaiveDate::from_ymd_opt(2026, 9, 8).unwrap(),
      tipo:         EntryType::FestivoLocal,
      subtipo:      Some(Scope::Local),
      descripcion:  Some("Fiesta patronal".into()),
      es_laborable: None,
      activo:       true,
    }
    .into();
    assert_eq!(c.meta.confidence, 1.0);
    assert_eq!(c.meta.reason, MANUAL_OVERRIDE_REASON);
    assert!(!c.es_laborable);
    assert_eq!(c.descripcion, "[LOCAL] Fiesta patronal");
    assert_eq!(c.label(), Some("local"));
  }

  #[test]
  fn candidate_json_accepts_label_alias_and_defaults_activo() {
    let json = serde_json::json!({
      "fecha": "2026-04-17",
      "tipo": "festivo_local",
      "label": "nacional",
      "descripcion": "[NACIONAL] 17/04 festivo nacional",
      "es_laborable": false,
      "meta": {
        "confidence": 0.9,
        "reason": "festivo",
        "source_line": "17/04 festivo nacional",
        "line_no": 2,
        "detected_month": 4,
        "detected_year": 2026
      }
    });
    let c: CalendarEntryCandidate = serde_json::from_value(json).unwrap();
    assert!(c.activo);
    assert_eq!(c.subtipo, Some(Scope::Nacional));
    assert!(!c.meta.is_range);
  }
}
