//! Month/year context threaded through a line scan.
//!
//! Calendars are laid out as month headers (`ABRIL 2026`) followed by day
//! lines (`17 Viernes Santo`), so a day line is only meaningful together with
//! the headers seen before it. [`ParseContext`] is a plain `Copy` value: each
//! line produces the next context from the previous one, which keeps parsing
//! free of shared state.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::fold;

static YEAR_TOKEN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("valid year regex"));

const MONTHS: &[(&str, u32)] = &[
  ("enero", 1),
  ("febrero", 2),
  ("marzo", 3),
  ("abril", 4),
  ("mayo", 5),
  ("junio", 6),
  ("julio", 7),
  ("agosto", 8),
  ("septiembre", 9),
  ("setiembre", 9),
  ("octubre", 10),
  ("noviembre", 11),
  ("diciembre", 12),
];

/// Month number for a Spanish month name; case, accents and surrounding
/// punctuation are ignored.
pub fn month_from_name(word: &str) -> Option<u32> {
  let folded = fold(word);
  let word = folded.trim_matches(|c: char| !c.is_alphanumeric());
  MONTHS
    .iter()
    .find(|(name, _)| *name == word)
    .map(|&(_, n)| n)
}

/// Every `20xx` token in `line`, in order of appearance.
pub fn year_tokens(line: &str) -> impl Iterator<Item = i32> + '_ {
  YEAR_TOKEN
    .captures_iter(line)
    .filter_map(|c| c[1].parse().ok())
}

/// The most frequent `20xx` token across `lines`; ties go to the year seen
/// first. `fallback` when the document names no year at all.
pub fn default_year<S: AsRef<str>>(lines: &[S], fallback: i32) -> i32 {
  let mut counts: Vec<(i32, usize)> = Vec::new();
  for year in lines.iter().flat_map(|l| year_tokens(l.as_ref())) {
    match counts.iter_mut().find(|(y, _)| *y == year) {
      Some((_, n)) => *n += 1,
      None => counts.push((year, 1)),
    }
  }
  counts
    .into_iter()
    .fold(None, |best: Option<(i32, usize)>, (y, n)| match best {
      Some((_, bn)) if bn >= n => best,
      _ => Some((y, n)),
    })
    .map_or(fallback, |(y, _)| y)
}

/// The month a line announces, if the line is a month name or starts or ends
/// with one.
fn month_header(line: &str) -> Option<u32> {
  let mut tokens = line.split_whitespace();
  let first = tokens.next()?;
  month_from_name(first).or_else(|| tokens.last().and_then(month_from_name))
}

/// The month/year in effect at a given line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
  /// `None` until the first month header.
  pub current_month: Option<u32>,
  pub current_year:  i32,
}

impl ParseContext {
  pub fn new(default_year: i32) -> Self {
    Self {
      current_month: None,
      current_year:  default_year,
    }
  }

  /// The context after reading `line`.
  pub fn observe(self, line: &str) -> Self {
    let mut next = self;
    if let Some(month) = month_header(line) {
      next.current_month = Some(month);
    }
    if let Some(year) = year_tokens(line).next() {
      next.current_year = year;
    }
    next
  }
}
