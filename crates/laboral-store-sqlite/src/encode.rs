//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 UTC strings so they sort as text. Dates
//! are `YYYY-MM-DD`. Enums use their `strum` names. Candidate metadata, day
//! snapshots and revert reports are compact JSON.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use laboral_core::{
  calendar::{CalendarDay, DaySnapshot, EntryType, Scope},
  import::{Import, ImportItem, ImportStats, Origin, RevertReport},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

/// Parse a `strum` enum name, naming the column on failure.
fn decode_enum<T: FromStr>(what: &str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::Decode(format!("unknown {what}: {s:?}")))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_snapshot(s: Option<&DaySnapshot>) -> Result<Option<String>> {
  Ok(s.map(serde_json::to_string).transpose()?)
}

pub fn decode_snapshot(s: Option<&str>) -> Result<Option<DaySnapshot>> {
  Ok(s.map(serde_json::from_str).transpose()?)
}

pub fn encode_report(r: &RevertReport) -> Result<String> { Ok(serde_json::to_string(r)?) }

pub fn decode_report(s: &str) -> Result<RevertReport> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values of an `imports` row, minus the revert bookkeeping.
pub struct RawImport {
  pub id:                String,
  pub empresa_id:        String,
  pub created_at:        String,
  pub origen:            String,
  pub creado_por:        String,
  pub creado_por_nombre: Option<String>,
  pub source_hash:       Option<String>,
  pub stats_total:       u32,
  pub stats_activos:     u32,
  pub stats_festivos:    u32,
  pub reverted_at:       Option<String>,
}

/// Select list matching [`RawImport::from_row`].
pub const IMPORT_COLUMNS: &str = "id, empresa_id, created_at, origen, creado_por, \
   creado_por_nombre, source_hash, stats_total, stats_activos, stats_festivos, reverted_at";

impl RawImport {
  pub fn from_import(i: &Import) -> Self {
    Self {
      id:                encode_uuid(i.id),
      empresa_id:        encode_uuid(i.empresa_id),
      created_at:        encode_dt(i.created_at),
      origen:            i.origen.as_ref().to_owned(),
      creado_por:        i.creado_por.clone(),
      creado_por_nombre: i.creado_por_nombre.clone(),
      source_hash:       i.source_hash.clone(),
      stats_total:       i.stats.total,
      stats_activos:     i.stats.activos,
      stats_festivos:    i.stats.festivos,
      reverted_at:       i.reverted_at.map(encode_dt),
    }
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      empresa_id:        row.get(1)?,
      created_at:        row.get(2)?,
      origen:            row.get(3)?,
      creado_por:        row.get(4)?,
      creado_por_nombre: row.get(5)?,
      source_hash:       row.get(6)?,
      stats_total:       row.get(7)?,
      stats_activos:     row.get(8)?,
      stats_festivos:    row.get(9)?,
      reverted_at:       row.get(10)?,
    })
  }

  pub fn into_import(self) -> Result<Import> {
    Ok(Import {
      id:                decode_uuid(&self.id)?,
      empresa_id:        decode_uuid(&self.empresa_id)?,
      created_at:        decode_dt(&self.created_at)?,
      origen:            decode_enum::<Origin>("origen", &self.origen)?,
      creado_por:        self.creado_por,
      creado_por_nombre: self.creado_por_nombre,
      source_hash:       self.source_hash,
      stats:             ImportStats {
        total:    self.stats_total,
        activos:  self.stats_activos,
        festivos: self.stats_festivos,
      },
      reverted_at:       self.reverted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Column values of an `import_items` row.
pub struct RawImportItem {
  pub item_id:      String,
  pub import_id:    String,
  pub fecha:        String,
  pub tipo:         String,
  pub subtipo:      Option<String>,
  pub descripcion:  String,
  pub es_laborable: bool,
  pub activo:       bool,
  pub meta_json:    String,
}

pub const ITEM_COLUMNS: &str =
  "item_id, import_id, fecha, tipo, subtipo, descripcion, es_laborable, activo, meta_json";

impl RawImportItem {
  pub fn from_item(item: &ImportItem) -> Result<Self> {
    Ok(Self {
      item_id:      encode_uuid(item.item_id),
      import_id:    encode_uuid(item.import_id),
      fecha:        encode_date(item.fecha),
      tipo:         item.tipo.as_ref().to_owned(),
      subtipo:      item.subtipo.map(|s| s.as_ref().to_owned()),
      descripcion:  item.descripcion.clone(),
      es_laborable: item.es_laborable,
      activo:       item.activo,
      meta_json:    serde_json::to_string(&item.meta)?,
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:      row.get(0)?,
      import_id:    row.get(1)?,
      fecha:        row.get(2)?,
      tipo:         row.get(3)?,
      subtipo:      row.get(4)?,
      descripcion:  row.get(5)?,
      es_laborable: row.get(6)?,
      activo:       row.get(7)?,
      meta_json:    row.get(8)?,
    })
  }

  pub fn into_item(self) -> Result<ImportItem> {
    Ok(ImportItem {
      item_id:      decode_uuid(&self.item_id)?,
      import_id:    decode_uuid(&self.import_id)?,
      fecha:        decode_date(&self.fecha)?,
      tipo:         decode_enum::<EntryType>("tipo", &self.tipo)?,
      subtipo:      self
        .subtipo
        .as_deref()
        .map(|s| decode_enum::<Scope>("subtipo", s))
        .transpose()?,
      descripcion:  self.descripcion,
      es_laborable: self.es_laborable,
      activo:       self.activo,
      meta:         serde_json::from_str(&self.meta_json)?,
    })
  }
}

/// Column values of a `calendar_days` row.
pub struct RawCalendarDay {
  pub empresa_id:       String,
  pub fecha:            String,
  pub es_laborable:     bool,
  pub tipo:             Option<String>,
  pub nombre:           Option<String>,
  pub activo:           bool,
  pub owning_import_id: Option<String>,
  pub previous_value:   Option<String>,
  pub updated_at:       String,
}

pub const DAY_COLUMNS: &str = "empresa_id, fecha, es_laborable, tipo, nombre, activo, \
   owning_import_id, previous_value, updated_at";

impl RawCalendarDay {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      empresa_id:       row.get(0)?,
      fecha:            row.get(1)?,
      es_laborable:     row.get(2)?,
      tipo:             row.get(3)?,
      nombre:           row.get(4)?,
      activo:           row.get(5)?,
      owning_import_id: row.get(6)?,
      previous_value:   row.get(7)?,
      updated_at:       row.get(8)?,
    })
  }

  pub fn into_day(self) -> Result<CalendarDay> {
    Ok(CalendarDay {
      empresa_id:       decode_uuid(&self.empresa_id)?,
      fecha:            decode_date(&self.fecha)?,
      es_laborable:     self.es_laborable,
      tipo:             self
        .tipo
        .as_deref()
        .map(|s| decode_enum::<EntryType>("tipo", s))
        .transpose()?,
      nombre:           self.nombre,
      activo:           self.activo,
      owning_import_id: self.owning_import_id.as_deref().map(decode_uuid).transpose()?,
      previous_value:   decode_snapshot(self.previous_value.as_deref())?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}
