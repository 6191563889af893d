//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are hyphenated lowercase strings, dates are `YYYY-MM-DD`, money is
//! a decimal string and timestamps are RFC 3339. Enum columns hold the
//! snake_case variant name.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use landlord_core::{
  building::Building,
  contract::Contract,
  furniture::Furniture,
  linkage::{Linkage, TenantLink},
  room::Room,
  tenant::{BlacklistEntry, Tenant, TenantProfile},
};
use rusqlite::Row;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_money(m: Decimal) -> String { m.to_string() }

pub fn decode_money(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

fn decode_variant<T: FromStr>(field: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::UnknownVariant { field, value: s.to_owned() })
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const BUILDING_COLUMNS: &str =
  "building_id, name, address, floors, room_count, cost, status";

pub const ROOM_COLUMNS: &str =
  "room_id, building_id, name, area, furniture_count, cost, rent, status";

pub const FURNITURE_COLUMNS: &str =
  "furniture_id, room_id, name, unit_cost, quantity, total_cost, note";

pub const TENANT_COLUMNS: &str = "tenant_id, name, national_id, phone, messaging_handle, \
                                  lock_id, lock_password, fingerprint, note, blacklisted, \
                                  contract_id";

pub const CONTRACT_COLUMNS: &str = "contract_id, room_id, tenant_id, start_date, end_date, \
                                    rent, deposit, cadence, status, total_rent, total_cash, \
                                    paid_through, last_payment_date, note";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `buildings` row.
pub struct RawBuilding {
  pub building_id: String,
  pub name:        String,
  pub address:     String,
  pub floors:      u32,
  pub room_count:  u32,
  pub cost:        String,
  pub status:      String,
}

impl RawBuilding {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      building_id: row.get(0)?,
      name:        row.get(1)?,
      address:     row.get(2)?,
      floors:      row.get(3)?,
      room_count:  row.get(4)?,
      cost:        row.get(5)?,
      status:      row.get(6)?,
    })
  }

  pub fn into_building(self) -> Result<Building> {
    Ok(Building {
      building_id: decode_uuid(&self.building_id)?,
      name:        self.name,
      address:     self.address,
      floors:      self.floors,
      room_count:  self.room_count,
      cost:        decode_money(&self.cost)?,
      status:      decode_variant("building status", &self.status)?,
    })
  }
}

pub struct RawRoom {
  pub room_id:         String,
  pub building_id:     String,
  pub name:            String,
  pub area:            f64,
  pub furniture_count: u32,
  pub cost:            String,
  pub rent:            String,
  pub status:          String,
}

impl RawRoom {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      room_id:         row.get(0)?,
      building_id:     row.get(1)?,
      name:            row.get(2)?,
      area:            row.get(3)?,
      furniture_count: row.get(4)?,
      cost:            row.get(5)?,
      rent:            row.get(6)?,
      status:          row.get(7)?,
    })
  }

  pub fn into_room(self) -> Result<Room> {
    Ok(Room {
      room_id:         decode_uuid(&self.room_id)?,
      building_id:     decode_uuid(&self.building_id)?,
      name:            self.name,
      area:            self.area,
      furniture_count: self.furniture_count,
      cost:            decode_money(&self.cost)?,
      rent:            decode_money(&self.rent)?,
      status:          decode_variant("room status", &self.status)?,
    })
  }
}

pub struct RawFurniture {
  pub furniture_id: String,
  pub room_id:      Option<String>,
  pub name:         String,
  pub unit_cost:    String,
  pub quantity:     u32,
  pub total_cost:   String,
  pub note:         Option<String>,
}

impl RawFurniture {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      furniture_id: row.get(0)?,
      room_id:      row.get(1)?,
      name:         row.get(2)?,
      unit_cost:    row.get(3)?,
      quantity:     row.get(4)?,
      total_cost:   row.get(5)?,
      note:         row.get(6)?,
    })
  }

  pub fn into_furniture(self) -> Result<Furniture> {
    Ok(Furniture {
      furniture_id: decode_uuid(&self.furniture_id)?,
      room_id:      decode_opt_uuid(self.room_id)?,
      name:         self.name,
      unit_cost:    decode_money(&self.unit_cost)?,
      quantity:     self.quantity,
      total_cost:   decode_money(&self.total_cost)?,
      note:         self.note,
    })
  }
}

pub struct RawTenant {
  pub tenant_id:   String,
  pub profile:     TenantProfile,
  pub blacklisted: bool,
  pub contract_id: Option<String>,
}

impl RawTenant {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      tenant_id:   row.get(0)?,
      profile:     TenantProfile {
        name:             row.get(1)?,
        national_id:      row.get(2)?,
        phone:            row.get(3)?,
        messaging_handle: row.get(4)?,
        lock_id:          row.get(5)?,
        lock_password:    row.get(6)?,
        fingerprint:      row.get(7)?,
        note:             row.get(8)?,
      },
      blacklisted: row.get(9)?,
      contract_id: row.get(10)?,
    })
  }

  /// Decode the row, resolving its linkage from the full set of link rows.
  pub fn into_tenant(self, links: &[TenantLink]) -> Result<Tenant> {
    let tenant_id = decode_uuid(&self.tenant_id)?;
    Ok(Tenant {
      tenant_id,
      profile: self.profile,
      blacklisted: self.blacklisted,
      contract_id: decode_opt_uuid(self.contract_id)?,
      linkage: Linkage::from_links(tenant_id, links),
    })
  }
}

pub struct RawContract {
  pub contract_id:       String,
  pub room_id:           Option<String>,
  pub tenant_id:         Option<String>,
  pub start_date:        String,
  pub end_date:          Option<String>,
  pub rent:              String,
  pub deposit:           String,
  pub cadence:           String,
  pub status:            String,
  pub total_rent:        String,
  pub total_cash:        String,
  pub paid_through:      Option<String>,
  pub last_payment_date: Option<String>,
  pub note:              Option<String>,
}

impl RawContract {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contract_id:       row.get(0)?,
      room_id:           row.get(1)?,
      tenant_id:         row.get(2)?,
      start_date:        row.get(3)?,
      end_date:          row.get(4)?,
      rent:              row.get(5)?,
      deposit:           row.get(6)?,
      cadence:           row.get(7)?,
      status:            row.get(8)?,
      total_rent:        row.get(9)?,
      total_cash:        row.get(10)?,
      paid_through:      row.get(11)?,
      last_payment_date: row.get(12)?,
      note:              row.get(13)?,
    })
  }

  pub fn into_contract(self) -> Result<Contract> {
    Ok(Contract {
      contract_id:       decode_uuid(&self.contract_id)?,
      room_id:           decode_opt_uuid(self.room_id)?,
      tenant_id:         decode_opt_uuid(self.tenant_id)?,
      start_date:        decode_date(&self.start_date)?,
      end_date:          decode_opt_date(self.end_date)?,
      rent:              decode_money(&self.rent)?,
      deposit:           decode_money(&self.deposit)?,
      cadence:           decode_variant("cadence", &self.cadence)?,
      status:            decode_variant("contract status", &self.status)?,
      total_rent:        decode_money(&self.total_rent)?,
      total_cash:        decode_money(&self.total_cash)?,
      paid_through:      decode_opt_date(self.paid_through)?,
      last_payment_date: decode_opt_date(self.last_payment_date)?,
      note:              self.note,
    })
  }
}

pub struct RawLink {
  pub sub_tenant_id:  String,
  pub main_tenant_id: String,
}

impl RawLink {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { sub_tenant_id: row.get(0)?, main_tenant_id: row.get(1)? })
  }

  pub fn into_link(self) -> Result<TenantLink> {
    Ok(TenantLink {
      sub_tenant_id:  decode_uuid(&self.sub_tenant_id)?,
      main_tenant_id: decode_uuid(&self.main_tenant_id)?,
    })
  }
}

pub struct RawBlacklistEntry {
  pub tenant_id:   String,
  pub reason:      Option<String>,
  pub recorded_at: String,
}

impl RawBlacklistEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { tenant_id: row.get(0)?, reason: row.get(1)?, recorded_at: row.get(2)? })
  }

  pub fn into_entry(self) -> Result<BlacklistEntry> {
    Ok(BlacklistEntry {
      tenant_id:   decode_uuid(&self.tenant_id)?,
      reason:      self.reason,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_are_iso_calendar_days() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(encode_date(d), "2024-02-29");
    assert!(decode_date("2024-02-30").is_err());
  }

  #[test]
  fn money_keeps_cents() {
    let m = decode_money("1234.50").unwrap();
    assert_eq!(m, Decimal::new(123450, 2));
    assert!(decode_money("12,00").is_err());
  }

  #[test]
  fn unknown_variant_names_the_field() {
    let err = decode_variant::<landlord_core::period::Cadence>("cadence", "weekly").unwrap_err();
    assert!(matches!(err, Error::UnknownVariant { field: "cadence", .. }));
  }
}
