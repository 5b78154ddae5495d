//! Transaction bodies for confirm and revert.
//!
//! Each function takes the raw connection, opens a `BEGIN IMMEDIATE`
//! transaction and commits only if every step succeeded; returning early
//! drops the transaction, which rolls it back. Taking the write lock up front
//! means ownership read inside the transaction cannot change under us.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use laboral_core::{
  Error as CoreError,
  calendar::DaySnapshot,
  import::{RevertReport, SkippedDay},
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    DAY_COLUMNS, RawCalendarDay, RawImport, RawImportItem, decode_date, decode_report,
    decode_uuid, encode_dt, encode_report, encode_snapshot, encode_uuid,
  },
};

// ─── Ledger row access ───────────────────────────────────────────────────────

fn read_day(tx: &Transaction<'_>, empresa_id: &str, fecha: &str) -> Result<Option<RawCalendarDay>> {
  Ok(
    tx.query_row(
      &format!("SELECT {DAY_COLUMNS} FROM calendar_days WHERE empresa_id = ?1 AND fecha = ?2"),
      rusqlite::params![empresa_id, fecha],
      RawCalendarDay::from_row,
    )
    .optional()?,
  )
}

/// The values a ledger row is set to.
struct DayWrite<'a> {
  es_laborable: bool,
  tipo:         Option<&'a str>,
  nombre:       Option<&'a str>,
  activo:       bool,
  owner:        Option<String>,
  previous:     Option<String>,
}

impl DayWrite<'static> {
  /// No explicit entry: a working day owned by nobody.
  fn default_state() -> Self {
    Self {
      es_laborable: true,
      tipo:         None,
      nombre:       None,
      activo:       false,
      owner:        None,
      previous:     None,
    }
  }
}

fn upsert_day(
  tx: &Transaction<'_>,
  empresa_id: &str,
  fecha: &str,
  write: &DayWrite<'_>,
  now: &str,
) -> Result<()> {
  tx.execute(
    "INSERT INTO calendar_days (
       empresa_id, fecha, es_laborable, tipo, nombre, activo,
       owning_import_id, previous_value, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT (empresa_id, fecha) DO UPDATE SET
       es_laborable     = excluded.es_laborable,
       tipo             = excluded.tipo,
       nombre           = excluded.nombre,
       activo           = excluded.activo,
       owning_import_id = excluded.owning_import_id,
       previous_value   = excluded.previous_value,
       updated_at       = excluded.updated_at",
    rusqlite::params![
      empresa_id,
      fecha,
      write.es_laborable,
      write.tipo,
      write.nombre,
      write.activo,
      write.owner,
      write.previous,
      now,
    ],
  )?;
  Ok(())
}

// ─── Confirm ─────────────────────────────────────────────────────────────────

/// Write the head, every audit item, and the ledger rows of active items.
pub fn confirm(conn: &mut Connection, head: &RawImport, items: &[RawImportItem]) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  tx.execute(
    "INSERT INTO imports (
       id, empresa_id, created_at, origen, creado_por, creado_por_nombre,
       source_hash, stats_total, stats_activos, stats_festivos
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    rusqlite::params![
      head.id,
      head.empresa_id,
      head.created_at,
      head.origen,
      head.creado_por,
      head.creado_por_nombre,
      head.source_hash,
      head.stats_total,
      head.stats_activos,
      head.stats_festivos,
    ],
  )?;

  for item in items {
    tx.execute(
      "INSERT INTO import_items (
         item_id, import_id, fecha, tipo, subtipo, descripcion,
         es_laborable, activo, meta_json
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      rusqlite::params![
        item.item_id,
        item.import_id,
        item.fecha,
        item.tipo,
        item.subtipo,
        item.descripcion,
        item.es_laborable,
        item.activo,
        item.meta_json,
      ],
    )?;

    // Rejected-in-review items stay in the audit trail only.
    if !item.activo {
      continue;
    }

    let previous = match read_day(&tx, &head.empresa_id, &item.fecha)? {
      Some(raw) => raw.into_day()?.snapshot(),
      None => None,
    };
    let write = DayWrite {
      es_laborable: item.es_laborable,
      tipo:         Some(item.tipo.as_str()),
      nombre:       Some(item.descripcion.as_str()),
      activo:       true,
      owner:        Some(head.id.clone()),
      previous:     encode_snapshot(previous.as_ref())?,
    };
    upsert_day(&tx, &head.empresa_id, &item.fecha, &write, &head.created_at)?;
  }

  tx.commit()?;
  Ok(())
}

// ─── Revert ──────────────────────────────────────────────────────────────────

/// The first snapshot in the chain whose owner has not itself been reverted.
fn live_snapshot(mut next: Option<DaySnapshot>, reverted: &HashSet<Uuid>) -> Option<DaySnapshot> {
  while let Some(snap) = next {
    match snap.owning_import_id {
      Some(owner) if reverted.contains(&owner) => next = snap.previous.map(|b| *b),
      _ => return Some(snap),
    }
  }
  None
}

fn reverted_imports(tx: &Transaction<'_>, empresa_id: &str) -> Result<HashSet<Uuid>> {
  let mut stmt =
    tx.prepare("SELECT id FROM imports WHERE empresa_id = ?1 AND reverted_at IS NOT NULL")?;
  let ids = stmt
    .query_map(rusqlite::params![empresa_id], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  ids.iter().map(|s| decode_uuid(s)).collect()
}

/// Restore every date `id` still owns, then mark the import reverted.
///
/// A repeated revert carrying the key that was stored with the first one
/// replays the stored report instead of failing.
pub fn revert(
  conn: &mut Connection,
  id: Uuid,
  idempotency_key: Option<String>,
  now: DateTime<Utc>,
) -> Result<RevertReport> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let id_str = encode_uuid(id);

  let head: Option<(String, Option<String>, Option<String>, Option<String>)> = tx
    .query_row(
      "SELECT empresa_id, reverted_at, revert_key, revert_report FROM imports WHERE id = ?1",
      rusqlite::params![id_str],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )
    .optional()?;

  let Some((empresa_id, reverted_at, stored_key, stored_report)) = head else {
    return Err(CoreError::ImportNotFound(id).into());
  };

  if reverted_at.is_some() {
    return match (idempotency_key, stored_key, stored_report) {
      (Some(key), Some(stored), Some(report)) if key == stored => {
        let mut report = decode_report(&report)?;
        report.replayed = true;
        Ok(report)
      }
      _ => Err(CoreError::ImportAlreadyReverted(id).into()),
    };
  }

  let mut reverted = reverted_imports(&tx, &empresa_id)?;
  reverted.insert(id);

  let fechas: Vec<String> = {
    let mut stmt = tx.prepare(
      "SELECT fecha FROM import_items WHERE import_id = ?1 AND activo = 1 ORDER BY fecha",
    )?;
    let rows = stmt
      .query_map(rusqlite::params![id_str], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    rows
  };

  let now_str = encode_dt(now);
  let mut restored: Vec<NaiveDate> = Vec::new();
  let mut skipped: Vec<SkippedDay> = Vec::new();

  for fecha in &fechas {
    let Some(raw) = read_day(&tx, &empresa_id, fecha)? else {
      continue;
    };
    let day = raw.into_day()?;
    match day.owning_import_id {
      Some(owner) if owner == id => {
        let write = match live_snapshot(day.previous_value, &reverted) {
          Some(snap) => {
            let previous = encode_snapshot(snap.previous.as_deref())?;
            let tipo = snap.tipo.as_ref().to_owned();
            upsert_day(
              &tx,
              &empresa_id,
              fecha,
              &DayWrite {
                es_laborable: snap.es_laborable,
                tipo:         Some(tipo.as_str()),
                nombre:       snap.nombre.as_deref(),
                activo:       snap.activo,
                owner:        snap.owning_import_id.map(encode_uuid),
                previous,
              },
              &now_str,
            )
          }
          None => upsert_day(&tx, &empresa_id, fecha, &DayWrite::default_state(), &now_str),
        };
        write?;
        restored.push(decode_date(fecha)?);
      }
      Some(owner) => skipped.push(SkippedDay { fecha: decode_date(fecha)?, owner }),
      // Already back at the default state; nothing of ours to undo.
      None => {}
    }
  }

  let report = RevertReport {
    import_id: id,
    reverted_at: now,
    restored,
    skipped,
    replayed: false,
  };

  tx.execute(
    "UPDATE imports SET reverted_at = ?2, revert_key = ?3, revert_report = ?4
     WHERE id = ?1 AND reverted_at IS NULL",
    rusqlite::params![id_str, now_str, idempotency_key, encode_report(&report)?],
  )?;

  tx.commit()?;
  Ok(report)
}
