//! Range expansion.

use chrono::NaiveDate;
use laboral_core::candidate::CalendarEntryCandidate;

/// Every calendar day from `start` to `end` inclusive; empty if `end < start`.
pub fn expand_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
  start.iter_days().take_while(|d| *d <= end).collect()
}

/// One copy of `template` per day of the range, each tagged `is_range`.
pub fn expand_candidate(
  template: &CalendarEntryCandidate,
  start: NaiveDate,
  end: NaiveDate,
) -> Vec<CalendarEntryCandidate> {
  expand_range(start, end)
    .into_iter()
    .map(|fecha| {
      let mut c = template.clone();
      c.fecha = fecha;
      c.meta.is_range = true;
      c
    })
    .collect()
}
