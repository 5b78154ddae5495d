//! SQL schema for the labor-calendar SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Import heads. Only reverted_at, revert_key and revert_report are ever
-- updated, and only once.
CREATE TABLE IF NOT EXISTS imports (
    id                TEXT PRIMARY KEY,
    empresa_id        TEXT NOT NULL,
    created_at        TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    origen            TEXT NOT NULL,   -- 'ocr' | 'manual' | 'mixto'
    creado_por        TEXT NOT NULL,
    creado_por_nombre TEXT,
    source_hash       TEXT,
    stats_total       INTEGER NOT NULL,
    stats_activos     INTEGER NOT NULL,
    stats_festivos    INTEGER NOT NULL,
    reverted_at       TEXT,
    revert_key        TEXT,            -- idempotency key of the revert
    revert_report     TEXT             -- JSON RevertReport
);

-- Audit trail. Strictly append-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS import_items (
    item_id      TEXT PRIMARY KEY,
    import_id    TEXT NOT NULL REFERENCES imports(id),
    fecha        TEXT NOT NULL,        -- YYYY-MM-DD
    tipo         TEXT NOT NULL,
    subtipo      TEXT,
    descripcion  TEXT NOT NULL,
    es_laborable INTEGER NOT NULL,
    activo       INTEGER NOT NULL,
    meta_json    TEXT NOT NULL,
    UNIQUE (import_id, fecha)
);

-- Live ledger: one row per company and date, never deleted.
-- tipo IS NULL marks the default (no explicit entry) state.
CREATE TABLE IF NOT EXISTS calendar_days (
    empresa_id       TEXT NOT NULL,
    fecha            TEXT NOT NULL,
    es_laborable     INTEGER NOT NULL,
    tipo             TEXT,
    nombre           TEXT,
    activo           INTEGER NOT NULL,
    owning_import_id TEXT REFERENCES imports(id),
    previous_value   TEXT,            -- JSON DaySnapshot chain or NULL
    updated_at       TEXT NOT NULL,
    PRIMARY KEY (empresa_id, fecha)
);

CREATE INDEX IF NOT EXISTS imports_empresa_idx ON imports(empresa_id, created_at);
CREATE INDEX IF NOT EXISTS imports_hash_idx    ON imports(source_hash);
CREATE INDEX IF NOT EXISTS items_import_idx    ON import_items(import_id);
CREATE INDEX IF NOT EXISTS days_owner_idx      ON calendar_days(owning_import_id);

PRAGMA user_version = 1;
";
