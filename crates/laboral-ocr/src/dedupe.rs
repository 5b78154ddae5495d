//! Same-date collapsing within one parse pass.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use laboral_core::candidate::CalendarEntryCandidate;

/// Keep one candidate per `fecha`, sorted by date.
///
/// The survivor is the one that [`beats`](CalendarEntryCandidate::beats) all
/// others on its date; on a full tie the earliest candidate stays.
pub fn dedupe<I>(candidates: I) -> Vec<CalendarEntryCandidate>
where
  I: IntoIterator<Item = CalendarEntryCandidate>,
{
  let mut by_date: BTreeMap<NaiveDate, CalendarEntryCandidate> = BTreeMap::new();
  for c in candidates {
    match by_date.get_mut(&c.fecha) {
      Some(existing) if c.beats(existing) => *existing = c,
      Some(_) => {}
      None => {
        by_date.insert(c.fecha, c);
      }
    }
  }
  by_date.into_values().collect()
}
