//! Date and range extraction.
//!
//! Forms are tried in a fixed order against the folded line: explicit range,
//! numeric date, then day with month name (or a bare leading day under a
//! month header). The first form that yields a valid date wins.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::{
  classify::has_keyword,
  context::{ParseContext, month_from_name},
  normalize::fold,
};

/// A date or inclusive date range found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
  Single(NaiveDate),
  Range { start: NaiveDate, end: NaiveDate },
}

// ─── Patterns ────────────────────────────────────────────────────────────────

/// `del 16 al 18 de abril`, `del 28 de diciembre al 2 de enero`.
static RANGE_DEL_AL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"\bdel\s+(\d{1,2})(?:\s+de\s+([a-z]+))?\s+al\s+(\d{1,2})(?:\s+de\s+([a-z]+))?",
  )
  .expect("valid del/al range regex")
});

/// `16-18 abril`, `16 - 18 de abril`.
static RANGE_DASH: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\d{1,2})\s*-\s*(\d{1,2})\s+(?:de\s+)?([a-z]+)")
    .expect("valid dash range regex")
});

/// `2026-04-17`.
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(20\d{2})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex")
});

/// `17/04`, `17-04-2026`, `17/4/26`.
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\d{1,2})[/-](\d{1,2})(?:[/-](\d{4}|\d{2}))?\b")
    .expect("valid numeric date regex")
});

/// `17 de abril`, `17 abril`.
static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\d{1,2})\s+(?:de\s+)?([a-z]+)").expect("valid day-month regex")
});

/// A day number opening the line, read against the current month.
static LEADING_DAY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d{1,2})(?:[\s.,:;)]|$)").expect("valid leading day regex")
});

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Build a date, rejecting out-of-range and calendar-impossible values.
fn make_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
  if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
    return None;
  }
  NaiveDate::from_ymd_opt(year, month, day)
}

fn number(caps: &Captures<'_>, i: usize) -> Option<u32> {
  caps.get(i).and_then(|m| m.as_str().parse().ok())
}

fn month_group(caps: &Captures<'_>, i: usize) -> Option<u32> {
  caps.get(i).and_then(|m| month_from_name(m.as_str()))
}

fn parse_year(raw: &str) -> Option<i32> {
  let y: i32 = raw.parse().ok()?;
  Some(if raw.len() == 2 { 2000 + y } else { y })
}

// ─── Forms ───────────────────────────────────────────────────────────────────

fn range_del_al(line: &str, ctx: &ParseContext) -> Option<Resolved> {
  let caps = RANGE_DEL_AL.captures(line)?;
  let start_day = number(&caps, 1)?;
  let end_day = number(&caps, 3)?;
  let start_named = month_group(&caps, 2);
  let end_named = month_group(&caps, 4);
  let start_month = start_named.or(end_named).or(ctx.current_month)?;
  let end_month = end_named.or(start_named).or(ctx.current_month)?;
  range(ctx.current_year, start_month, start_day, end_month, end_day)
}

fn range_dash(line: &str, ctx: &ParseContext) -> Option<Resolved> {
  RANGE_DASH.captures_iter(line).find_map(|caps| {
    let month = month_group(&caps, 3)?;
    range(ctx.current_year, month, number(&caps, 1)?, month, number(&caps, 2)?)
  })
}

/// A range whose end month precedes its start month crosses into next year.
fn range(
  year: i32,
  start_month: u32,
  start_day: u32,
  end_month: u32,
  end_day: u32,
) -> Option<Resolved> {
  let end_year = if end_month < start_month { year + 1 } else { year };
  Some(Resolved::Range {
    start: make_date(year, start_month, start_day)?,
    end:   make_date(end_year, end_month, end_day)?,
  })
}

fn numeric(line: &str, ctx: &ParseContext) -> Option<Resolved> {
  if let Some(caps) = ISO_DATE.captures(line) {
    let year = parse_year(&caps[1])?;
    return make_date(year, number(&caps, 2)?, number(&caps, 3)?).map(Resolved::Single);
  }
  let caps = NUMERIC_DATE.captures(line)?;
  let year = match caps.get(3) {
    Some(y) => parse_year(y.as_str())?,
    None => ctx.current_year,
  };
  make_date(year, number(&caps, 2)?, number(&caps, 1)?).map(Resolved::Single)
}

fn day_month(line: &str, ctx: &ParseContext) -> Option<Resolved> {
  if ctx.current_month.is_none() && !has_keyword(line) {
    return None;
  }
  let named = DAY_MONTH.captures_iter(line).find_map(|caps| {
    Some((number(&caps, 1)?, month_group(&caps, 2)?))
  });
  let (day, month) = match named {
    Some(dm) => dm,
    None => {
      let caps = LEADING_DAY.captures(line)?;
      (number(&caps, 1)?, ctx.current_month?)
    }
  };
  make_date(ctx.current_year, month, day).map(Resolved::Single)
}

/// Find the date or range a (weekday-stripped) line refers to.
///
/// A range that cannot be placed in a month falls through to the single-date
/// forms. A numeric form that matches but yields an invalid date rejects the
/// line.
pub fn resolve(line: &str, ctx: &ParseContext) -> Option<Resolved> {
  let folded = fold(line);
  let line = folded.as_str();

  if let Some(r) = range_del_al(line, ctx).or_else(|| range_dash(line, ctx)) {
    return Some(r);
  }
  if ISO_DATE.is_match(line) || NUMERIC_DATE.is_match(line) {
    return numeric(line, ctx);
  }
  day_month(line, ctx)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ctx(month: Option<u32>, year: i32) -> ParseContext {
    ParseContext { current_month: month, current_year: year }
  }

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn del_al_range_with_trailing_month() {
    let r = resolve("del 16 al 18 de abril", &ctx(None, 2026));
    assert_eq!(r, Some(Resolved::Range { start: ymd(2026, 4, 16), end: ymd(2026, 4, 18) }));
  }

  #[test]
  fn del_al_range_uses_context_month_when_unnamed() {
    let r = resolve("Cierre del 3 al 5", &ctx(Some(8), 2026));
    assert_eq!(r, Some(Resolved::Range { start: ymd(2026, 8, 3), end: ymd(2026, 8, 5) }));
    assert_eq!(resolve("Cierre del 3 al 5", &ctx(None, 2026)), None);
  }

  #[test]
  fn del_al_range_across_year_end() {
    let r = resolve("Cierre del 28 de diciembre al 2 de enero", &ctx(None, 2026));
    assert_eq!(r, Some(Resolved::Range { start: ymd(2026, 12, 28), end: ymd(2027, 1, 2) }));
  }

  #[test]
  fn hour_spans_are_not_date_ranges() {
    let c = ctx(Some(7), 2026);
    assert_eq!(
      resolve("1 jornada intensiva de 8 a 15 h", &c),
      Some(Resolved::Single(ymd(2026, 7, 1)))
    );
    assert_eq!(resolve("horario de 9 a 14", &c), None);
  }

  #[test]
  fn unplaced_range_falls_back_to_single_date() {
    let c = ctx(None, 2026);
    assert_eq!(
      resolve("6 de enero festivo, horario de 9 a 14", &c),
      Some(Resolved::Single(ymd(2026, 1, 6)))
    );
    assert_eq!(
      resolve("festivo 6 de enero, turno del 9 al 14", &c),
      Some(Resolved::Single(ymd(2026, 1, 6)))
    );
  }

  #[test]
  fn dash_range_with_month_name() {
    let r = resolve("16-18 ABRIL Semana Santa", &ctx(None, 2026));
    assert_eq!(r, Some(Resolved::Range { start: ymd(2026, 4, 16), end: ymd(2026, 4, 18) }));
  }

  #[test]
  fn numeric_date_defaults_year_from_context() {
    assert_eq!(resolve("17/04 festivo", &ctx(None, 2026)), Some(Resolved::Single(ymd(2026, 4, 17))));
    assert_eq!(resolve("17-04-2027", &ctx(None, 2026)), Some(Resolved::Single(ymd(2027, 4, 17))));
    assert_eq!(resolve("1/5/26 Trabajo", &ctx(None, 2020)), Some(Resolved::Single(ymd(2026, 5, 1))));
  }

  #[test]
  fn iso_date() {
    assert_eq!(resolve("2026-10-12 Hispanidad", &ctx(None, 2020)), Some(Resolved::Single(ymd(2026, 10, 12))));
  }

  #[test]
  fn invalid_values_are_rejected() {
    assert_eq!(resolve("32/01 festivo", &ctx(None, 2026)), None);
    assert_eq!(resolve("10/13 festivo", &ctx(None, 2026)), None);
    assert_eq!(resolve("30/02 festivo", &ctx(None, 2026)), None);
    assert_eq!(resolve("del 40 al 42 de mayo", &ctx(None, 2026)), None);
  }

  #[test]
  fn day_month_requires_context_or_keyword() {
    assert_eq!(resolve("6 de enero", &ctx(None, 2026)), None);
    assert_eq!(resolve("6 de enero festivo", &ctx(None, 2026)), Some(Resolved::Single(ymd(2026, 1, 6))));
    assert_eq!(resolve("6 de enero", &ctx(Some(3), 2026)), Some(Resolved::Single(ymd(2026, 1, 6))));
  }

  #[test]
  fn leading_day_reads_current_month() {
    assert_eq!(resolve("24 San Juan", &ctx(Some(6), 2026)), Some(Resolved::Single(ymd(2026, 6, 24))));
    assert_eq!(resolve("24 San Juan", &ctx(None, 2026)), None);
    assert_eq!(resolve("Pagina 24", &ctx(Some(6), 2026)), None);
  }

  #[test]
  fn dateless_lines_resolve_to_nothing() {
    assert_eq!(resolve("Calendario laboral", &ctx(Some(1), 2026)), None);
    assert_eq!(resolve("ABRIL 2026", &ctx(Some(4), 2026)), None);
  }
}
