//! SQL schema for the landlord SQLite store.
//!
//! [`SCHEMA`] creates any missing table. Databases written by earlier
//! versions are then brought forward column by column in [`upgrade`], and
//! [`INDEXES`] runs last since some indexes cover upgraded columns.

use std::collections::HashSet;

use rusqlite::Connection;
use tracing::{info, warn};

pub const SCHEMA_VERSION: u32 = 2;

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Money columns hold decimal strings. Dates are `YYYY-MM-DD`. Foreign keys
/// carry no `ON DELETE` action; the cascade planner clears references
/// before any parent row goes.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS buildings (
    building_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    address     TEXT NOT NULL,
    floors      INTEGER NOT NULL DEFAULT 0,
    room_count  INTEGER NOT NULL DEFAULT 0,    -- derived by the cost rollup
    cost        TEXT NOT NULL DEFAULT '0',     -- derived by the cost rollup
    status      TEXT NOT NULL DEFAULT 'available'
);

CREATE TABLE IF NOT EXISTS rooms (
    room_id         TEXT PRIMARY KEY,
    building_id     TEXT NOT NULL REFERENCES buildings(building_id),
    name            TEXT NOT NULL,
    area            REAL NOT NULL DEFAULT 0,
    furniture_count INTEGER NOT NULL DEFAULT 0,
    cost            TEXT NOT NULL DEFAULT '0',
    rent            TEXT NOT NULL DEFAULT '0',
    status          TEXT NOT NULL DEFAULT 'vacant'
);

-- room_id is NULL for items kept in storage.
CREATE TABLE IF NOT EXISTS furniture (
    furniture_id TEXT PRIMARY KEY,
    room_id      TEXT REFERENCES rooms(room_id),
    name         TEXT NOT NULL,
    unit_cost    TEXT NOT NULL DEFAULT '0',
    quantity     INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0),
    total_cost   TEXT NOT NULL DEFAULT '0',
    note         TEXT
);

CREATE TABLE IF NOT EXISTS tenants (
    tenant_id        TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    national_id      TEXT,
    phone            TEXT,
    messaging_handle TEXT,
    lock_id          TEXT,
    lock_password    TEXT,
    fingerprint      TEXT,
    note             TEXT,
    blacklisted      INTEGER NOT NULL DEFAULT 0,
    contract_id      TEXT REFERENCES contracts(contract_id)
);

CREATE TABLE IF NOT EXISTS contracts (
    contract_id       TEXT PRIMARY KEY,
    room_id           TEXT REFERENCES rooms(room_id),
    tenant_id         TEXT REFERENCES tenants(tenant_id),
    start_date        TEXT NOT NULL,
    end_date          TEXT,
    rent              TEXT NOT NULL DEFAULT '0',
    deposit           TEXT NOT NULL DEFAULT '0',
    cadence           TEXT NOT NULL DEFAULT 'monthly',
    status            TEXT NOT NULL DEFAULT 'pending',
    total_rent        TEXT NOT NULL DEFAULT '0',
    total_cash        TEXT NOT NULL DEFAULT '0',
    paid_through      TEXT,
    last_payment_date TEXT,
    note              TEXT
);

-- A sub-tenant hangs under exactly one main tenant.
CREATE TABLE IF NOT EXISTS tenant_links (
    sub_tenant_id  TEXT NOT NULL UNIQUE REFERENCES tenants(tenant_id),
    main_tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id),
    UNIQUE (sub_tenant_id, main_tenant_id),
    CHECK  (sub_tenant_id != main_tenant_id)
);

-- Append-only; rows only go away with their tenant.
CREATE TABLE IF NOT EXISTS blacklist_log (
    entry_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id   TEXT NOT NULL REFERENCES tenants(tenant_id),
    reason      TEXT,
    recorded_at TEXT NOT NULL              -- ISO 8601 UTC
);
";

pub const INDEXES: &str = "
CREATE INDEX IF NOT EXISTS rooms_building_idx    ON rooms(building_id);
CREATE INDEX IF NOT EXISTS furniture_room_idx    ON furniture(room_id);
CREATE INDEX IF NOT EXISTS contracts_room_idx    ON contracts(room_id);
CREATE INDEX IF NOT EXISTS contracts_tenant_idx  ON contracts(tenant_id);
CREATE INDEX IF NOT EXISTS links_main_idx        ON tenant_links(main_tenant_id);
CREATE INDEX IF NOT EXISTS blacklist_tenant_idx  ON blacklist_log(tenant_id);
";

// ─── Upgrades ────────────────────────────────────────────────────────────────

/// A column added after the first release, with the statement that
/// back-fills it on existing rows.
struct ColumnUpgrade {
  column: &'static str,
  sql:    &'static str,
}

const CONTRACT_UPGRADES: &[ColumnUpgrade] = &[
  ColumnUpgrade {
    column: "cadence",
    sql:    "ALTER TABLE contracts ADD COLUMN cadence TEXT NOT NULL DEFAULT 'monthly';",
  },
  ColumnUpgrade {
    column: "last_payment_date",
    sql:    "ALTER TABLE contracts ADD COLUMN last_payment_date TEXT;
             UPDATE contracts SET last_payment_date = start_date
              WHERE last_payment_date IS NULL;",
  },
  ColumnUpgrade {
    column: "tenant_id",
    sql:    "ALTER TABLE contracts ADD COLUMN tenant_id TEXT REFERENCES tenants(tenant_id);
             UPDATE contracts SET tenant_id = (
               SELECT t.tenant_id FROM tenants t
                WHERE t.contract_id = contracts.contract_id
                  AND t.tenant_id NOT IN (SELECT sub_tenant_id FROM tenant_links)
                ORDER BY t.rowid LIMIT 1
             ) WHERE tenant_id IS NULL;",
  },
  ColumnUpgrade {
    column: "paid_through",
    sql:    "ALTER TABLE contracts ADD COLUMN paid_through TEXT;
             UPDATE contracts SET paid_through = start_date WHERE paid_through IS NULL;",
  },
];

fn columns(conn: &Connection, table: &str) -> rusqlite::Result<HashSet<String>> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
  let names = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<HashSet<_>>>()?;
  Ok(names)
}

/// Add any missing upgrade column. Each step is independent: a failure is
/// logged and the remaining steps still run.
pub fn upgrade(conn: &Connection) {
  let existing = match columns(conn, "contracts") {
    Ok(existing) => existing,
    Err(err) => {
      warn!(error = %err, "could not inspect contracts columns; skipping upgrades");
      return;
    }
  };

  for step in CONTRACT_UPGRADES {
    if existing.contains(step.column) {
      continue;
    }
    match conn.execute_batch(step.sql) {
      Ok(()) => info!(column = step.column, "upgraded contracts table"),
      Err(err) => warn!(column = step.column, error = %err, "contracts upgrade failed"),
    }
  }
}

/// Run the full initialisation sequence on a fresh or existing database.
pub fn init(conn: &Connection) -> rusqlite::Result<()> {
  conn.execute_batch(SCHEMA)?;
  upgrade(conn);
  conn.execute_batch(INDEXES)?;
  conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
  Ok(())
}
