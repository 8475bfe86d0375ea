//! SQL schema for the tome SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys are deliberately not declared: dangling edge targets and
/// proofs that arrive ahead of their unit are data here, not errors.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS units (
    unit_id      TEXT PRIMARY KEY,    -- 4-char uppercase code
    label        TEXT NOT NULL,
    kind         TEXT NOT NULL,       -- lowercase kind name
    locator      TEXT NOT NULL,       -- dotted structural path
    body         TEXT NOT NULL,
    active       INTEGER NOT NULL DEFAULT 0,
    display_name TEXT
);

CREATE TABLE IF NOT EXISTS proofs (
    unit_id TEXT NOT NULL,
    ordinal INTEGER NOT NULL,
    body    TEXT NOT NULL,
    PRIMARY KEY (unit_id, ordinal)
);

CREATE TABLE IF NOT EXISTS footnotes (
    label TEXT PRIMARY KEY,
    body  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS extras (
    unit_id TEXT NOT NULL,
    kind    TEXT NOT NULL,    -- 'slogan' | 'history' | 'reference'
    body    TEXT NOT NULL,
    PRIMARY KEY (unit_id, kind)
);

-- Recomputed views below: each is fully replaced, in one transaction, on
-- every sync run.

CREATE TABLE IF NOT EXISTS dependencies (
    from_id TEXT NOT NULL,
    to_id   TEXT NOT NULL     -- may be dangling
);

CREATE TABLE IF NOT EXISTS citations (
    unit_id TEXT NOT NULL,
    key     TEXT NOT NULL,
    UNIQUE (unit_id, key)
);

CREATE TABLE IF NOT EXISTS search_units (
    unit_id TEXT PRIMARY KEY,
    body    TEXT NOT NULL     -- unit body plus its proofs, concatenated
);

CREATE TABLE IF NOT EXISTS search_statements (
    unit_id TEXT PRIMARY KEY,
    body    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS part_links (
    part_id    TEXT NOT NULL,
    chapter_id TEXT NOT NULL,
    UNIQUE (part_id, chapter_id)
);

CREATE TABLE IF NOT EXISTS unit_statistics (
    unit_id TEXT NOT NULL,
    metric  TEXT NOT NULL,
    value   INTEGER NOT NULL,
    UNIQUE (unit_id, metric)
);

CREATE TABLE IF NOT EXISTS book_statistics (
    name  TEXT PRIMARY KEY,
    value REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS units_label_idx       ON units(label);
CREATE INDEX IF NOT EXISTS dependencies_from_idx ON dependencies(from_id);
CREATE INDEX IF NOT EXISTS dependencies_to_idx   ON dependencies(to_id);
CREATE INDEX IF NOT EXISTS citations_unit_idx    ON citations(unit_id);
CREATE INDEX IF NOT EXISTS proofs_unit_idx       ON proofs(unit_id);

PRAGMA user_version = 1;
";
