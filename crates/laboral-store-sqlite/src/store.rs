//! [`SqliteStore`]: confirm, revert and ledger reads over one SQLite file.

use std::path::Path;

use chrono::{NaiveDate, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use laboral_core::{
  Error as CoreError,
  calendar::CalendarDay,
  import::{Import, ImportDetail, ImportItem, ImportStats, NewImport, RevertReport},
  store::{CalendarStore, ImportQuery},
};

use crate::{
  Error, Result,
  encode::{
    DAY_COLUMNS, IMPORT_COLUMNS, ITEM_COLUMNS, RawCalendarDay, RawImport, RawImportItem,
    encode_date, encode_uuid,
  },
  ledger,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A labor-calendar store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CalendarStore impl ──────────────────────────────────────────────────────

impl CalendarStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn confirm_import(&self, input: NewImport) -> Result<Import> {
    if input.items.is_empty() {
      return Err(CoreError::InvalidInput("an import needs at least one item".into()).into());
    }

    let import = Import {
      id:                Uuid::new_v4(),
      empresa_id:        input.empresa_id,
      created_at:        Utc::now().trunc_subsecs(6),
      origen:            input.origen,
      creado_por:        input.creado_por,
      creado_por_nombre: input.creado_por_nombre,
      source_hash:       input.source_hash,
      stats:             ImportStats::from_items(&input.items),
      reverted_at:       None,
    };

    let head = RawImport::from_import(&import);
    let items = input
      .items
      .into_iter()
      .map(|c| RawImportItem::from_item(&ImportItem::from_candidate(import.id, c)))
      .collect::<Result<Vec<_>>>()?;

    let outcome = self
      .conn
      .call(move |conn| Ok(ledger::confirm(conn, &head, &items)))
      .await
      .map_err(Error::from)
      .and_then(|r| r);

    match outcome {
      Ok(()) => {
        tracing::info!(
          import_id = %import.id,
          empresa_id = %import.empresa_id,
          origen = %import.origen,
          total = import.stats.total,
          activos = import.stats.activos,
          "import confirmed"
        );
        Ok(import)
      }
      Err(e) => {
        tracing::warn!(empresa_id = %import.empresa_id, error = %e, "import rolled back");
        Err(CoreError::ImportConfirmFailed { cause: e.to_string() }.into())
      }
    }
  }

  async fn revert_import(
    &self,
    id: Uuid,
    idempotency_key: Option<String>,
  ) -> Result<RevertReport> {
    // Stored at microsecond precision.
    let now = Utc::now().trunc_subsecs(6);
    let report = self
      .conn
      .call(move |conn| Ok(ledger::revert(conn, id, idempotency_key, now)))
      .await??;

    tracing::info!(
      import_id = %id,
      restored = report.restored.len(),
      skipped = report.skipped.len(),
      replayed = report.replayed,
      "import reverted"
    );
    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn import_detail(&self, id: Uuid) -> Result<Option<ImportDetail>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawImport, Vec<RawImportItem>)> = self
      .conn
      .call(move |conn| {
        let head = conn
          .query_row(
            &format!("SELECT {IMPORT_COLUMNS} FROM imports WHERE id = ?1"),
            rusqlite::params![id_str],
            RawImport::from_row,
          )
          .optional()?;
        let Some(head) = head else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS} FROM import_items WHERE import_id = ?1 ORDER BY fecha"
        ))?;
        let items = stmt
          .query_map(rusqlite::params![id_str], RawImportItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((head, items)))
      })
      .await?;

    let Some((head, items)) = raw else {
      return Ok(None);
    };
    Ok(Some(ImportDetail {
      import: head.into_import()?,
      items:  items
        .into_iter()
        .map(RawImportItem::into_item)
        .collect::<Result<_>>()?,
    }))
  }

  async fn list_imports(&self, query: &ImportQuery) -> Result<Vec<Import>> {
    let empresa_str = query.empresa_id.map(encode_uuid);
    let source_hash = query.source_hash.clone();
    let only_active = query.include_reverted == Some(false);
    let limit_val   = query.limit.unwrap_or(100) as i64;
    let offset_val  = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawImport> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<&'static str> = vec![];
        if empresa_str.is_some() {
          conds.push("empresa_id = ?1");
        }
        if source_hash.is_some() {
          conds.push("source_hash = ?2");
        }
        if only_active {
          conds.push("reverted_at IS NULL");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {IMPORT_COLUMNS} FROM imports
           {where_clause}
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              empresa_str.as_deref(),
              source_hash.as_deref(),
              limit_val,
              offset_val,
            ],
            RawImport::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawImport::into_import).collect()
  }

  async fn get_day(&self, empresa_id: Uuid, fecha: NaiveDate) -> Result<Option<CalendarDay>> {
    let empresa_str = encode_uuid(empresa_id);
    let fecha_str = encode_date(fecha);

    let raw: Option<RawCalendarDay> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DAY_COLUMNS} FROM calendar_days WHERE empresa_id = ?1 AND fecha = ?2"
              ),
              rusqlite::params![empresa_str, fecha_str],
              RawCalendarDay::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCalendarDay::into_day).transpose()
  }

  async fn list_days(
    &self,
    empresa_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
  ) -> Result<Vec<CalendarDay>> {
    let empresa_str = encode_uuid(empresa_id);
    let from_str = from.map(encode_date);
    let to_str = to.map(encode_date);

    let raws: Vec<RawCalendarDay> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DAY_COLUMNS} FROM calendar_days
           WHERE empresa_id = ?1
             AND (?2 IS NULL OR fecha >= ?2)
             AND (?3 IS NULL OR fecha <= ?3)
           ORDER BY fecha"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![empresa_str, from_str, to_str],
            RawCalendarDay::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCalendarDay::into_day).collect()
  }
}
