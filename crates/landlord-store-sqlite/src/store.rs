//! [`SqliteStore`], the SQLite implementation of [`RentalStore`].

use std::path::Path;

use landlord_core::{
  building::Building,
  contract::Contract,
  furniture::Furniture,
  linkage::TenantLink,
  room::Room,
  store::RentalStore,
  tenant::{BlacklistEntry, Tenant},
};
use rusqlite::{Connection, OptionalExtension as _, Row, params};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    BUILDING_COLUMNS, CONTRACT_COLUMNS, FURNITURE_COLUMNS, ROOM_COLUMNS, RawBlacklistEntry,
    RawBuilding, RawContract, RawFurniture, RawLink, RawRoom, RawTenant, TENANT_COLUMNS,
    encode_date, encode_dt, encode_money, encode_uuid,
  },
  schema,
};

type RowMapper<R> = fn(&Row<'_>) -> rusqlite::Result<R>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A landlord ledger backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, creating and upgrading the schema.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening sqlite store");
    Self::from_connection(Connection::open(path)?)
  }

  /// Open an in-memory store.
  pub fn open_in_memory() -> Result<Self> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  /// Adopt an already-open connection, e.g. one holding an older schema.
  pub fn from_connection(conn: Connection) -> Result<Self> {
    schema::init(&conn)?;
    Ok(Self { conn })
  }

  pub fn schema_version(&self) -> Result<u32> {
    Ok(self.conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
  }

  fn query_one<R>(&self, sql: &str, id: Uuid, map: RowMapper<R>) -> Result<Option<R>> {
    Ok(self.conn.query_row(sql, params![encode_uuid(id)], map).optional()?)
  }

  fn query_all<R>(&self, sql: &str, map: RowMapper<R>) -> Result<Vec<R>> {
    let mut stmt = self.conn.prepare(sql)?;
    let rows = stmt.query_map([], map)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  fn delete_by_id(&self, sql: &str, id: Uuid) -> Result<()> {
    self.conn.execute(sql, params![encode_uuid(id)])?;
    Ok(())
  }

  fn savepoint(&self, sql: &str) -> landlord_core::Result<()> {
    self.conn.execute_batch(sql).map_err(Error::from)?;
    Ok(())
  }
}

// ─── RentalStore impl ────────────────────────────────────────────────────────

impl RentalStore for SqliteStore {
  type Error = Error;

  fn atomically<T>(
    &mut self,
    f: impl FnOnce(&mut Self) -> landlord_core::Result<T>,
  ) -> landlord_core::Result<T> {
    self.savepoint("SAVEPOINT atomic")?;
    match f(self) {
      Ok(value) => {
        self.savepoint("RELEASE atomic")?;
        Ok(value)
      }
      Err(err) => {
        if let Err(rollback) = self.savepoint("ROLLBACK TO atomic; RELEASE atomic") {
          warn!(error = %rollback, "rollback failed");
        }
        Err(err)
      }
    }
  }

  // ── Buildings ─────────────────────────────────────────────────────────────

  fn insert_building(&mut self, b: &Building) -> Result<()> {
    self.conn.execute(
      &format!("INSERT INTO buildings ({BUILDING_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
      params![
        encode_uuid(b.building_id),
        b.name,
        b.address,
        b.floors,
        b.room_count,
        encode_money(b.cost),
        b.status.as_ref(),
      ],
    )?;
    Ok(())
  }

  fn get_building(&self, id: Uuid) -> Result<Option<Building>> {
    self
      .query_one(
        &format!("SELECT {BUILDING_COLUMNS} FROM buildings WHERE building_id = ?1"),
        id,
        RawBuilding::from_row,
      )?
      .map(RawBuilding::into_building)
      .transpose()
  }

  fn list_buildings(&self) -> Result<Vec<Building>> {
    self
      .query_all(
        &format!("SELECT {BUILDING_COLUMNS} FROM buildings ORDER BY rowid"),
        RawBuilding::from_row,
      )?
      .into_iter()
      .map(RawBuilding::into_building)
      .collect()
  }

  fn update_building(&mut self, b: &Building) -> Result<()> {
    self.conn.execute(
      "UPDATE buildings
          SET name = ?2, address = ?3, floors = ?4, room_count = ?5, cost = ?6, status = ?7
        WHERE building_id = ?1",
      params![
        encode_uuid(b.building_id),
        b.name,
        b.address,
        b.floors,
        b.room_count,
        encode_money(b.cost),
        b.status.as_ref(),
      ],
    )?;
    Ok(())
  }

  fn delete_building(&mut self, id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM buildings WHERE building_id = ?1", id)
  }

  // ── Rooms ─────────────────────────────────────────────────────────────────

  fn insert_room(&mut self, r: &Room) -> Result<()> {
    self.conn.execute(
      &format!("INSERT INTO rooms ({ROOM_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
      params![
        encode_uuid(r.room_id),
        encode_uuid(r.building_id),
        r.name,
        r.area,
        r.furniture_count,
        encode_money(r.cost),
        encode_money(r.rent),
        r.status.as_ref(),
      ],
    )?;
    Ok(())
  }

  fn get_room(&self, id: Uuid) -> Result<Option<Room>> {
    self
      .query_one(
        &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE room_id = ?1"),
        id,
        RawRoom::from_row,
      )?
      .map(RawRoom::into_room)
      .transpose()
  }

  fn list_rooms(&self) -> Result<Vec<Room>> {
    self
      .query_all(&format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY rowid"), RawRoom::from_row)?
      .into_iter()
      .map(RawRoom::into_room)
      .collect()
  }

  fn update_room(&mut self, r: &Room) -> Result<()> {
    self.conn.execute(
      "UPDATE rooms
          SET building_id = ?2, name = ?3, area = ?4, furniture_count = ?5,
              cost = ?6, rent = ?7, status = ?8
        WHERE room_id = ?1",
      params![
        encode_uuid(r.room_id),
        encode_uuid(r.building_id),
        r.name,
        r.area,
        r.furniture_count,
        encode_money(r.cost),
        encode_money(r.rent),
        r.status.as_ref(),
      ],
    )?;
    Ok(())
  }

  fn delete_room(&mut self, id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM rooms WHERE room_id = ?1", id)
  }

  // ── Furniture ─────────────────────────────────────────────────────────────

  fn insert_furniture(&mut self, f: &Furniture) -> Result<()> {
    self.conn.execute(
      &format!("INSERT INTO furniture ({FURNITURE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
      params![
        encode_uuid(f.furniture_id),
        f.room_id.map(encode_uuid),
        f.name,
        encode_money(f.unit_cost),
        f.quantity,
        encode_money(f.total_cost),
        f.note,
      ],
    )?;
    Ok(())
  }

  fn get_furniture(&self, id: Uuid) -> Result<Option<Furniture>> {
    self
      .query_one(
        &format!("SELECT {FURNITURE_COLUMNS} FROM furniture WHERE furniture_id = ?1"),
        id,
        RawFurniture::from_row,
      )?
      .map(RawFurniture::into_furniture)
      .transpose()
  }

  fn list_furniture(&self) -> Result<Vec<Furniture>> {
    self
      .query_all(
        &format!("SELECT {FURNITURE_COLUMNS} FROM furniture ORDER BY rowid"),
        RawFurniture::from_row,
      )?
      .into_iter()
      .map(RawFurniture::into_furniture)
      .collect()
  }

  fn update_furniture(&mut self, f: &Furniture) -> Result<()> {
    self.conn.execute(
      "UPDATE furniture
          SET room_id = ?2, name = ?3, unit_cost = ?4, quantity = ?5,
              total_cost = ?6, note = ?7
        WHERE furniture_id = ?1",
      params![
        encode_uuid(f.furniture_id),
        f.room_id.map(encode_uuid),
        f.name,
        encode_money(f.unit_cost),
        f.quantity,
        encode_money(f.total_cost),
        f.note,
      ],
    )?;
    Ok(())
  }

  fn delete_furniture(&mut self, id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM furniture WHERE furniture_id = ?1", id)
  }

  // ── Tenants ───────────────────────────────────────────────────────────────

  fn insert_tenant(&mut self, t: &Tenant) -> Result<()> {
    let p = &t.profile;
    self.conn.execute(
      &format!(
        "INSERT INTO tenants ({TENANT_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
      ),
      params![
        encode_uuid(t.tenant_id),
        p.name,
        p.national_id,
        p.phone,
        p.messaging_handle,
        p.lock_id,
        p.lock_password,
        p.fingerprint,
        p.note,
        t.blacklisted,
        t.contract_id.map(encode_uuid),
      ],
    )?;
    Ok(())
  }

  fn get_tenant(&self, id: Uuid) -> Result<Option<Tenant>> {
    let Some(raw) = self.query_one(
      &format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE tenant_id = ?1"),
      id,
      RawTenant::from_row,
    )?
    else {
      return Ok(None);
    };
    let links = self.list_links()?;
    raw.into_tenant(&links).map(Some)
  }

  fn list_tenants(&self) -> Result<Vec<Tenant>> {
    let links = self.list_links()?;
    self
      .query_all(
        &format!("SELECT {TENANT_COLUMNS} FROM tenants ORDER BY rowid"),
        RawTenant::from_row,
      )?
      .into_iter()
      .map(|raw| raw.into_tenant(&links))
      .collect()
  }

  fn update_tenant(&mut self, t: &Tenant) -> Result<()> {
    let p = &t.profile;
    self.conn.execute(
      "UPDATE tenants
          SET name = ?2, national_id = ?3, phone = ?4, messaging_handle = ?5,
              lock_id = ?6, lock_password = ?7, fingerprint = ?8, note = ?9,
              blacklisted = ?10, contract_id = ?11
        WHERE tenant_id = ?1",
      params![
        encode_uuid(t.tenant_id),
        p.name,
        p.national_id,
        p.phone,
        p.messaging_handle,
        p.lock_id,
        p.lock_password,
        p.fingerprint,
        p.note,
        t.blacklisted,
        t.contract_id.map(encode_uuid),
      ],
    )?;
    Ok(())
  }

  fn delete_tenant(&mut self, id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM tenants WHERE tenant_id = ?1", id)
  }

  fn insert_link(&mut self, link: &TenantLink) -> Result<()> {
    self.conn.execute(
      "INSERT INTO tenant_links (sub_tenant_id, main_tenant_id) VALUES (?1, ?2)",
      params![encode_uuid(link.sub_tenant_id), encode_uuid(link.main_tenant_id)],
    )?;
    Ok(())
  }

  fn delete_link(&mut self, sub_tenant_id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM tenant_links WHERE sub_tenant_id = ?1", sub_tenant_id)
  }

  fn list_links(&self) -> Result<Vec<TenantLink>> {
    self
      .query_all(
        "SELECT sub_tenant_id, main_tenant_id FROM tenant_links ORDER BY rowid",
        RawLink::from_row,
      )?
      .into_iter()
      .map(RawLink::into_link)
      .collect()
  }

  fn append_blacklist_entry(&mut self, entry: &BlacklistEntry) -> Result<()> {
    self.conn.execute(
      "INSERT INTO blacklist_log (tenant_id, reason, recorded_at) VALUES (?1, ?2, ?3)",
      params![encode_uuid(entry.tenant_id), entry.reason, encode_dt(entry.recorded_at)],
    )?;
    Ok(())
  }

  fn list_blacklist_entries(&self, tenant_id: Uuid) -> Result<Vec<BlacklistEntry>> {
    let mut stmt = self.conn.prepare(
      "SELECT tenant_id, reason, recorded_at FROM blacklist_log
        WHERE tenant_id = ?1 ORDER BY entry_id",
    )?;
    let raws = stmt
      .query_map(params![encode_uuid(tenant_id)], RawBlacklistEntry::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawBlacklistEntry::into_entry).collect()
  }

  fn purge_blacklist_entries(&mut self, tenant_id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM blacklist_log WHERE tenant_id = ?1", tenant_id)
  }

  // ── Contracts ─────────────────────────────────────────────────────────────

  fn insert_contract(&mut self, c: &Contract) -> Result<()> {
    self.conn.execute(
      &format!(
        "INSERT INTO contracts ({CONTRACT_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
      ),
      params![
        encode_uuid(c.contract_id),
        c.room_id.map(encode_uuid),
        c.tenant_id.map(encode_uuid),
        encode_date(c.start_date),
        c.end_date.map(encode_date),
        encode_money(c.rent),
        encode_money(c.deposit),
        c.cadence.as_ref(),
        c.status.as_ref(),
        encode_money(c.total_rent),
        encode_money(c.total_cash),
        c.paid_through.map(encode_date),
        c.last_payment_date.map(encode_date),
        c.note,
      ],
    )?;
    Ok(())
  }

  fn get_contract(&self, id: Uuid) -> Result<Option<Contract>> {
    self
      .query_one(
        &format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE contract_id = ?1"),
        id,
        RawContract::from_row,
      )?
      .map(RawContract::into_contract)
      .transpose()
  }

  fn list_contracts(&self) -> Result<Vec<Contract>> {
    self
      .query_all(
        &format!("SELECT {CONTRACT_COLUMNS} FROM contracts ORDER BY rowid"),
        RawContract::from_row,
      )?
      .into_iter()
      .map(RawContract::into_contract)
      .collect()
  }

  fn update_contract(&mut self, c: &Contract) -> Result<()> {
    self.conn.execute(
      "UPDATE contracts
          SET room_id = ?2, tenant_id = ?3, start_date = ?4, end_date = ?5,
              rent = ?6, deposit = ?7, cadence = ?8, status = ?9,
              total_rent = ?10, total_cash = ?11, paid_through = ?12,
              last_payment_date = ?13, note = ?14
        WHERE contract_id = ?1",
      params![
        encode_uuid(c.contract_id),
        c.room_id.map(encode_uuid),
        c.tenant_id.map(encode_uuid),
        encode_date(c.start_date),
        c.end_date.map(encode_date),
        encode_money(c.rent),
        encode_money(c.deposit),
        c.cadence.as_ref(),
        c.status.as_ref(),
        encode_money(c.total_rent),
        encode_money(c.total_cash),
        c.paid_through.map(encode_date),
        c.last_payment_date.map(encode_date),
        c.note,
      ],
    )?;
    Ok(())
  }

  fn delete_contract(&mut self, id: Uuid) -> Result<()> {
    self.delete_by_id("DELETE FROM contracts WHERE contract_id = ?1", id)
  }
}
