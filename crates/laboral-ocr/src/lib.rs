//! OCR text → calendar candidates.
//!
//! Turns the raw text of a scanned labor calendar into a date-sorted list of
//! [`CalendarEntryCandidate`]s. Pure synchronous code; no HTTP or database
//! dependencies. A line that yields no valid date is dropped, never an error.
//!
//! # Quick start
//!
//! ```no_run
//! use laboral_ocr::{ParseOptions, preview};
//!
//! let text = "ABRIL 2026\n17/04 festivo nacional\n";
//! let p = preview(text, &ParseOptions::default());
//! println!("{} candidates, document {}", p.candidates.len(), p.document_hash);
//! ```

pub mod classify;
pub mod context;
pub mod dedupe;
pub mod expand;
pub mod fingerprint;
pub mod normalize;
pub mod resolve;

use chrono::{Datelike, Utc};
use laboral_core::candidate::{CalendarEntryCandidate, CandidateMeta, annotate};
use serde::Serialize;
use tracing::debug;

pub use crate::dedupe::dedupe;
use crate::{
  classify::classify,
  context::{ParseContext, default_year},
  expand::expand_candidate,
  fingerprint::document_hash,
  normalize::{normalize, strip_weekday},
  resolve::{Resolved, resolve},
};

// ─── Public types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
  /// Year used when the document names none. Defaults to the current year.
  pub fallback_year: Option<i32>,
}

impl ParseOptions {
  fn fallback_year(&self) -> i32 {
    self.fallback_year.unwrap_or_else(|| Utc::now().year())
  }
}

/// What a reviewer sees before confirming an import.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
  /// One candidate per date, sorted by date.
  pub candidates:    Vec<CalendarEntryCandidate>,
  /// Fingerprint of the normalized text; see [`fingerprint`].
  pub document_hash: String,
  pub lines_total:   usize,
  /// Lines that produced at least one candidate.
  pub lines_matched: usize,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse `raw` into candidates, in document order and without deduplication.
///
/// Ranges are expanded to one candidate per day.
pub fn parse(raw: &str, opts: &ParseOptions) -> Vec<CalendarEntryCandidate> {
  scan(&normalize(raw), opts).0
}

/// Parse and deduplicate `raw`, and fingerprint the document.
pub fn preview(raw: &str, opts: &ParseOptions) -> Preview {
  let lines = normalize(raw);
  let (candidates, lines_matched) = scan(&lines, opts);
  Preview {
    candidates: dedupe(candidates),
    document_hash: document_hash(&lines),
    lines_total: lines.len(),
    lines_matched,
  }
}

// ─── Line scan ───────────────────────────────────────────────────────────────

fn scan(lines: &[String], opts: &ParseOptions) -> (Vec<CalendarEntryCandidate>, usize) {
  let mut ctx = ParseContext::new(default_year(lines, opts.fallback_year()));
  let mut candidates = Vec::new();
  let mut matched = 0;

  for (i, line) in lines.iter().enumerate() {
    ctx = ctx.observe(line);
    let line_no = i + 1;
    let found = parse_line(line, line_no, &ctx);
    if found.is_empty() {
      debug!(line_no, line = %line, "no calendar date on line, skipped");
      continue;
    }
    matched += 1;
    candidates.extend(found);
  }

  (candidates, matched)
}

fn parse_line(line: &str, line_no: usize, ctx: &ParseContext) -> Vec<CalendarEntryCandidate> {
  let body = strip_weekday(line);
  let Some(resolved) = resolve(body, ctx) else {
    return Vec::new();
  };
  let class = classify(body);

  let (start, end) = match resolved {
    Resolved::Single(d) => (d, d),
    Resolved::Range { start, end } => (start, end),
  };
  let template = CalendarEntryCandidate {
    fecha:        start,
    tipo:         class.tipo,
    subtipo:      class.subtipo,
    descripcion:  annotate(class.subtipo, line),
    es_laborable: class.es_laborable,
    activo:       true,
    meta:         CandidateMeta {
      confidence:     class.confidence,
      reason:         class.reason.to_owned(),
      source_line:    Some(line.to_owned()),
      line_no:        Some(line_no),
      detected_month: ctx.current_month,
      detected_year:  Some(ctx.current_year),
      is_range:       false,
    },
  };

  match resolved {
    Resolved::Single(_) => vec![template],
    Resolved::Range { .. } => expand_candidate(&template, start, end),
  }
}
