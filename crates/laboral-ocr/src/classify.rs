//! Rule-cascade classifier for calendar lines.
//!
//! [`RULES`] is an ordered table of `(predicate, outcome)` pairs; the first
//! rule whose predicate holds decides the line. Lines that match nothing fall
//! through to [`FALLBACK`], which keeps the date a working day: an unknown line
//! must never silently cancel work.

use laboral_core::calendar::{EntryType, Scope};

use crate::normalize::fold;

/// The outcome of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
  pub tipo:         EntryType,
  pub es_laborable: bool,
  pub subtipo:      Option<Scope>,
  pub confidence:   f64,
  /// The `reason` id of the rule that fired.
  pub reason:       &'static str,
}

/// One entry of the cascade. Predicates receive folded text (see
/// [`fold`]).
pub struct Rule {
  pub reason:        &'static str,
  pub predicate:     fn(&str) -> bool,
  pub tipo:          EntryType,
  pub es_laborable:  bool,
  pub confidence:    f64,
  /// Scope used when the line names none.
  pub default_scope: Option<Scope>,
}

impl Rule {
  /// Apply this rule alone to an already-folded line.
  pub fn apply(&self, folded: &str) -> Option<Classification> {
    (self.predicate)(folded).then(|| self.outcome(folded))
  }

  fn outcome(&self, folded: &str) -> Classification {
    Classification {
      tipo:         self.tipo,
      es_laborable: self.es_laborable,
      subtipo:      detect_scope(folded).or(self.default_scope),
      confidence:   self.confidence,
      reason:       self.reason,
    }
  }
}

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// Words that mark a line as calendar content.
const CLASSIFICATION_KEYWORDS: &[&str] =
  &["festivo", "convenio", "cierre", "laborable", "fiesta"];

/// Names of national holidays, folded.
const HOLIDAY_NAMES: &[&str] = &[
  "navidad",
  "ano nuevo",
  "reyes",
  "viernes santo",
  "jueves santo",
  "domingo de resurreccion",
  "lunes de pascua",
  "todos los santos",
  "constitucion",
  "inmaculada",
  "dia del trabajador",
  "asuncion",
  "hispanidad",
];

fn contains_any(folded: &str, needles: &[&str]) -> bool {
  needles.iter().any(|n| folded.contains(n))
}

/// Whether a line carries one of the classification keywords.
pub fn has_keyword(line: &str) -> bool {
  contains_any(&fold(line), CLASSIFICATION_KEYWORDS)
}

fn has_word(folded: &str, matches: impl Fn(&str) -> bool) -> bool {
  folded
    .split(|c: char| !c.is_alphanumeric())
    .any(matches)
}

/// Scope words are matched whole, so "internacional" or "localidad" set none.
fn detect_scope(folded: &str) -> Option<Scope> {
  if has_word(folded, |w| w == "nacional") {
    Some(Scope::Nacional)
  } else if has_word(folded, |w| {
    w.starts_with("autonom") || w == "comunidad" || w == "regional"
  }) {
    Some(Scope::Autonomico)
  } else if has_word(folded, |w| w == "local" || w == "municipal") {
    Some(Scope::Local)
  } else if has_word(folded, |w| w == "convenio") {
    Some(Scope::Convenio)
  } else {
    None
  }
}

// ─── Cascade ─────────────────────────────────────────────────────────────────

pub const RULES: &[Rule] = &[
  Rule {
    reason:        "cierre",
    predicate:     |l| contains_any(l, &["cierre", "cerrado"]),
    tipo:          EntryType::CierreEmpresa,
    es_laborable:  false,
    confidence:    0.90,
    default_scope: None,
  },
  Rule {
    reason:        "laborable_extra",
    predicate:     |l| {
      l.contains("laborable") && contains_any(l, &["extra", "adicional"])
    },
    tipo:          EntryType::LaborableExtra,
    es_laborable:  true,
    confidence:    0.85,
    default_scope: None,
  },
  Rule {
    reason:        "convenio",
    predicate:     |l| {
      contains_any(l, &["convenio", "ajuste", "jornada", "intensiva"])
    },
    tipo:          EntryType::Convenio,
    es_laborable:  true,
    confidence:    0.75,
    default_scope: Some(Scope::Convenio),
  },
  Rule {
    reason:        "festivo",
    predicate:     |l| contains_any(l, &["festivo", "fiesta"]),
    tipo:          EntryType::FestivoLocal,
    es_laborable:  false,
    confidence:    0.90,
    default_scope: Some(Scope::Local),
  },
  Rule {
    reason:        "holiday_name",
    predicate:     |l| contains_any(l, HOLIDAY_NAMES),
    tipo:          EntryType::FestivoLocal,
    es_laborable:  false,
    confidence:    0.70,
    default_scope: Some(Scope::Nacional),
  },
];

pub const FALLBACK: Rule = Rule {
  reason:        "fallback",
  predicate:     |_| true,
  tipo:          EntryType::Convenio,
  es_laborable:  true,
  confidence:    0.35,
  default_scope: None,
};

/// Classify a (weekday-stripped) line.
pub fn classify(line: &str) -> Classification {
  let folded = fold(line);
  RULES
    .iter()
    .find_map(|rule| rule.apply(&folded))
    .unwrap_or_else(|| FALLBACK.outcome(&folded))
}
