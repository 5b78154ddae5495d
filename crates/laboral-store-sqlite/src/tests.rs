//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use laboral_core::{
  Coded, ErrorCode,
  calendar::{EntryType, Scope, is_working_day},
  candidate::{CalendarEntryCandidate, CandidateMeta, annotate},
  import::{NewImport, Origin},
  store::{CalendarStore, ImportQuery},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn candidate(fecha: NaiveDate, tipo: EntryType) -> CalendarEntryCandidate {
  let scope = (tipo == EntryType::FestivoLocal).then_some(Scope::Nacional);
  CalendarEntryCandidate {
    fecha,
    tipo,
    subtipo: scope,
    descripcion: annotate(scope, &format!("{fecha} {tipo}")),
    es_laborable: tipo.default_laborable(),
    activo: true,
    meta: CandidateMeta {
      confidence:     0.9,
      reason:         "test".into(),
      source_line:    Some(format!("{fecha} {tipo}")),
      line_no:        Some(1),
      detected_month: None,
      detected_year:  None,
      is_range:       false,
    },
  }
}

fn batch(empresa_id: Uuid, items: Vec<CalendarEntryCandidate>) -> NewImport {
  NewImport {
    empresa_id,
    origen: Origin::Ocr,
    creado_por: "u-1".into(),
    creado_por_nombre: Some("Rev Iewer".into()),
    source_hash: None,
    items,
  }
}

// ─── Confirm ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn confirm_persists_head_items_and_ledger() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let reyes = ymd(2026, 1, 6);

  let import = s
    .confirm_import(batch(empresa, vec![
      candidate(ymd(2026, 1, 1), EntryType::FestivoLocal),
      candidate(reyes, EntryType::FestivoLocal),
      candidate(ymd(2026, 1, 7), EntryType::Convenio),
    ]))
    .await
    .unwrap();
  assert_eq!(import.stats.total, 3);
  assert_eq!(import.stats.activos, 3);
  assert_eq!(import.stats.festivos, 2);
  assert!(import.reverted_at.is_none());

  let detail = s.import_detail(import.id).await.unwrap().unwrap();
  assert_eq!(detail.import, import);
  assert_eq!(detail.items.len(), 3);
  assert_eq!(detail.items[1].fecha, reyes);
  assert_eq!(detail.items[1].subtipo, Some(Scope::Nacional));
  assert_eq!(detail.items[1].meta.reason, "test");

  let day = s.get_day(empresa, reyes).await.unwrap().unwrap();
  assert_eq!(day.tipo, Some(EntryType::FestivoLocal));
  assert_eq!(day.owning_import_id, Some(import.id));
  assert!(day.previous_value.is_none());
  assert!(!is_working_day(Some(&day)));
  assert!(is_working_day(s.get_day(empresa, ymd(2026, 1, 7)).await.unwrap().as_ref()));
}

#[tokio::test]
async fn empty_batch_is_invalid_input() {
  let s = store().await;
  let err = s.confirm_import(batch(Uuid::new_v4(), vec![])).await.unwrap_err();
  assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn failed_confirm_persists_nothing() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let day = ymd(2026, 5, 1);

  // Two items on one date violate the per-import uniqueness constraint.
  let err = s
    .confirm_import(batch(empresa, vec![
      candidate(ymd(2026, 4, 30), EntryType::CierreEmpresa),
      candidate(day, EntryType::FestivoLocal),
      candidate(day, EntryType::Convenio),
    ]))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(laboral_core::Error::ImportConfirmFailed { .. })
  ));

  assert!(s.list_imports(&ImportQuery::default()).await.unwrap().is_empty());
  assert!(s.list_days(empresa, None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn inactive_items_are_audited_but_not_applied() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let mut rejected = candidate(ymd(2026, 3, 19), EntryType::FestivoLocal);
  rejected.activo = false;

  let import = s
    .confirm_import(batch(empresa, vec![
      rejected,
      candidate(ymd(2026, 3, 20), EntryType::FestivoLocal),
    ]))
    .await
    .unwrap();
  assert_eq!(import.stats.total, 2);
  assert_eq!(import.stats.activos, 1);
  assert_eq!(import.stats.festivos, 1);

  let detail = s.import_detail(import.id).await.unwrap().unwrap();
  assert_eq!(detail.items.len(), 2);
  assert!(!detail.items[0].activo);

  assert!(s.get_day(empresa, ymd(2026, 3, 19)).await.unwrap().is_none());
  assert!(s.get_day(empresa, ymd(2026, 3, 20)).await.unwrap().is_some());
}

// ─── Revert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn revert_restores_default_and_keeps_items() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let fecha = ymd(2026, 8, 15);
  let import = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::FestivoLocal)]))
    .await
    .unwrap();

  let report = s.revert_import(import.id, None).await.unwrap();
  assert_eq!(report.import_id, import.id);
  assert_eq!(report.restored, vec![fecha]);
  assert!(report.skipped.is_empty());
  assert!(!report.replayed);

  let day = s.get_day(empresa, fecha).await.unwrap().unwrap();
  assert_eq!(day.tipo, None);
  assert!(day.es_laborable);
  assert!(day.owning_import_id.is_none());
  assert!(is_working_day(Some(&day)));

  let detail = s.import_detail(import.id).await.unwrap().unwrap();
  assert_eq!(detail.import.reverted_at, Some(report.reverted_at));
  assert_eq!(detail.items.len(), 1);
}

#[tokio::test]
async fn revert_missing_import_is_not_found() {
  let s = store().await;
  let err = s.revert_import(Uuid::new_v4(), None).await.unwrap_err();
  assert_eq!(err.code(), ErrorCode::ImportNotFound);
}

#[tokio::test]
async fn second_revert_fails_and_leaves_ledger_unchanged() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let fecha = ymd(2026, 1, 6);
  let a = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::FestivoLocal)]))
    .await
    .unwrap();
  s.revert_import(a.id, None).await.unwrap();
  let before = s.get_day(empresa, fecha).await.unwrap();

  let err = s.revert_import(a.id, None).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(laboral_core::Error::ImportAlreadyReverted(id)) if id == a.id
  ));
  assert_eq!(s.get_day(empresa, fecha).await.unwrap(), before);
}

#[tokio::test]
async fn revert_skips_dates_claimed_by_newer_import() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let fecha = ymd(2026, 1, 6);

  let a = s
    .confirm_import(batch(empresa, vec![
      candidate(fecha, EntryType::FestivoLocal),
      candidate(ymd(2026, 1, 7), EntryType::FestivoLocal),
    ]))
    .await
    .unwrap();
  let b = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::LaborableExtra)]))
    .await
    .unwrap();

  let layered = s.get_day(empresa, fecha).await.unwrap().unwrap();
  assert_eq!(layered.owning_import_id, Some(b.id));
  let prev = layered.previous_value.as_ref().unwrap();
  assert_eq!(prev.tipo, EntryType::FestivoLocal);
  assert_eq!(prev.owning_import_id, Some(a.id));

  let report = s.revert_import(a.id, None).await.unwrap();
  assert_eq!(report.restored, vec![ymd(2026, 1, 7)]);
  assert_eq!(report.skipped.len(), 1);
  assert_eq!(report.skipped[0].fecha, fecha);
  assert_eq!(report.skipped[0].owner, b.id);

  let day = s.get_day(empresa, fecha).await.unwrap().unwrap();
  assert_eq!(day.tipo, Some(EntryType::LaborableExtra));
  assert_eq!(day.owning_import_id, Some(b.id));
  assert!(day.es_laborable);
}

#[tokio::test]
async fn reverting_newer_import_restores_older_value() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let fecha = ymd(2026, 1, 6);
  let a = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::FestivoLocal)]))
    .await
    .unwrap();
  let b = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::LaborableExtra)]))
    .await
    .unwrap();

  let report = s.revert_import(b.id, None).await.unwrap();
  assert_eq!(report.restored, vec![fecha]);

  let day = s.get_day(empresa, fecha).await.unwrap().unwrap();
  assert_eq!(day.tipo, Some(EntryType::FestivoLocal));
  assert_eq!(day.owning_import_id, Some(a.id));
  assert!(!day.es_laborable);
  assert!(day.previous_value.is_none());
}

#[tokio::test]
async fn chained_reverts_land_on_default_state() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let fecha = ymd(2026, 1, 6);
  let a = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::FestivoLocal)]))
    .await
    .unwrap();
  let b = s
    .confirm_import(batch(empresa, vec![candidate(fecha, EntryType::CierreEmpresa)]))
    .await
    .unwrap();

  s.revert_import(a.id, None).await.unwrap();
  let report = s.revert_import(b.id, None).await.unwrap();
  assert_eq!(report.restored, vec![fecha]);

  // A is reverted too, so its snapshot must not come back.
  let day = s.get_day(empresa, fecha).await.unwrap().unwrap();
  assert_eq!(day.tipo, None);
  assert!(day.owning_import_id.is_none());
  assert!(is_working_day(Some(&day)));
}

#[tokio::test]
async fn repeated_revert_with_same_key_replays_report() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  let import = s
    .confirm_import(batch(empresa, vec![candidate(ymd(2026, 12, 25), EntryType::FestivoLocal)]))
    .await
    .unwrap();

  let first = s.revert_import(import.id, Some("key-1".into())).await.unwrap();
  let again = s.revert_import(import.id, Some("key-1".into())).await.unwrap();
  assert!(again.replayed);
  assert_eq!(again.restored, first.restored);
  assert_eq!(again.reverted_at, first.reverted_at);

  let other = s.revert_import(import.id, Some("key-2".into())).await.unwrap_err();
  assert_eq!(other.code(), ErrorCode::ImportAlreadyReverted);
  let keyless = s.revert_import(import.id, None).await.unwrap_err();
  assert_eq!(keyless.code(), ErrorCode::ImportAlreadyReverted);
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_imports_filters_and_orders_newest_first() {
  let s = store().await;
  let (e1, e2) = (Uuid::new_v4(), Uuid::new_v4());

  let mut hashed = batch(e1, vec![candidate(ymd(2026, 1, 1), EntryType::FestivoLocal)]);
  hashed.source_hash = Some("abc".into());
  let first = s.confirm_import(hashed).await.unwrap();
  let second = s
    .confirm_import(batch(e1, vec![candidate(ymd(2026, 1, 2), EntryType::Convenio)]))
    .await
    .unwrap();
  s.confirm_import(batch(e2, vec![candidate(ymd(2026, 1, 3), EntryType::Convenio)]))
    .await
    .unwrap();
  s.revert_import(second.id, None).await.unwrap();

  let all = s.list_imports(&ImportQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);

  let q = ImportQuery { empresa_id: Some(e1), ..Default::default() };
  let mine = s.list_imports(&q).await.unwrap();
  assert_eq!(mine.iter().map(|i| i.id).collect::<Vec<_>>(), vec![second.id, first.id]);
  assert!(mine[0].reverted_at.is_some());

  let q = ImportQuery { empresa_id: Some(e1), include_reverted: Some(false), ..Default::default() };
  let live = s.list_imports(&q).await.unwrap();
  assert_eq!(live.len(), 1);
  assert_eq!(live[0].id, first.id);

  let q = ImportQuery { source_hash: Some("abc".into()), ..Default::default() };
  let by_hash = s.list_imports(&q).await.unwrap();
  assert_eq!(by_hash.len(), 1);
  assert_eq!(by_hash[0].creado_por_nombre.as_deref(), Some("Rev Iewer"));

  let q = ImportQuery { limit: Some(1), offset: Some(1), ..Default::default() };
  assert_eq!(s.list_imports(&q).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_days_respects_range() {
  let s = store().await;
  let empresa = Uuid::new_v4();
  s.confirm_import(batch(empresa, vec![
    candidate(ymd(2026, 3, 1), EntryType::Convenio),
    candidate(ymd(2026, 3, 15), EntryType::FestivoLocal),
    candidate(ymd(2026, 4, 1), EntryType::CierreEmpresa),
  ]))
  .await
  .unwrap();

  let march = s
    .list_days(empresa, Some(ymd(2026, 3, 1)), Some(ymd(2026, 3, 31)))
    .await
    .unwrap();
  assert_eq!(march.len(), 2);
  assert_eq!(march[1].fecha, ymd(2026, 3, 15));

  let from_mid = s.list_days(empresa, Some(ymd(2026, 3, 2)), None).await.unwrap();
  assert_eq!(from_mid.len(), 2);
  assert!(s.list_days(Uuid::new_v4(), None, None).await.unwrap().is_empty());
}
