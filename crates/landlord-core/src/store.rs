//! The `RentalStore` trait.
//!
//! Implemented by storage backends (e.g. `landlord-store-sqlite`). The
//! [`crate::Bookkeeper`] depends on this abstraction only. Methods are plain
//! row operations; every business rule lives in this crate.

use uuid::Uuid;

use crate::{
  building::Building,
  contract::Contract,
  furniture::Furniture,
  linkage::TenantLink,
  room::Room,
  tenant::{BlacklistEntry, Tenant},
};

/// Abstraction over a landlord ledger backend.
///
/// Lists return records in insertion order. Reads of [`Tenant`] resolve the
/// tenant's [`crate::linkage::Linkage`] from the link rows; writes of a
/// tenant never touch links.
pub trait RentalStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run `f` as one atomic unit: every write it makes is committed if it
  /// returns `Ok` and rolled back if it returns `Err`. Calls may nest.
  fn atomically<T>(
    &mut self,
    f: impl FnOnce(&mut Self) -> crate::Result<T>,
  ) -> crate::Result<T>;

  // ── Buildings ─────────────────────────────────────────────────────────

  fn insert_building(&mut self, building: &Building) -> Result<(), Self::Error>;
  fn get_building(&self, id: Uuid) -> Result<Option<Building>, Self::Error>;
  fn list_buildings(&self) -> Result<Vec<Building>, Self::Error>;
  fn update_building(&mut self, building: &Building) -> Result<(), Self::Error>;
  fn delete_building(&mut self, id: Uuid) -> Result<(), Self::Error>;

  // ── Rooms ─────────────────────────────────────────────────────────────

  fn insert_room(&mut self, room: &Room) -> Result<(), Self::Error>;
  fn get_room(&self, id: Uuid) -> Result<Option<Room>, Self::Error>;
  fn list_rooms(&self) -> Result<Vec<Room>, Self::Error>;
  fn update_room(&mut self, room: &Room) -> Result<(), Self::Error>;
  fn delete_room(&mut self, id: Uuid) -> Result<(), Self::Error>;

  // ── Furniture ─────────────────────────────────────────────────────────

  fn insert_furniture(&mut self, item: &Furniture) -> Result<(), Self::Error>;
  fn get_furniture(&self, id: Uuid) -> Result<Option<Furniture>, Self::Error>;
  fn list_furniture(&self) -> Result<Vec<Furniture>, Self::Error>;
  fn update_furniture(&mut self, item: &Furniture) -> Result<(), Self::Error>;
  fn delete_furniture(&mut self, id: Uuid) -> Result<(), Self::Error>;

  // ── Tenants ───────────────────────────────────────────────────────────

  fn insert_tenant(&mut self, tenant: &Tenant) -> Result<(), Self::Error>;
  fn get_tenant(&self, id: Uuid) -> Result<Option<Tenant>, Self::Error>;
  fn list_tenants(&self) -> Result<Vec<Tenant>, Self::Error>;
  fn update_tenant(&mut self, tenant: &Tenant) -> Result<(), Self::Error>;
  fn delete_tenant(&mut self, id: Uuid) -> Result<(), Self::Error>;

  /// Insert a link row. The backend enforces one main tenant per sub-tenant.
  fn insert_link(&mut self, link: &TenantLink) -> Result<(), Self::Error>;
  /// Remove the link row of `sub_tenant_id`, if any.
  fn delete_link(&mut self, sub_tenant_id: Uuid) -> Result<(), Self::Error>;
  fn list_links(&self) -> Result<Vec<TenantLink>, Self::Error>;

  fn append_blacklist_entry(&mut self, entry: &BlacklistEntry) -> Result<(), Self::Error>;
  /// Log rows for one tenant, oldest first.
  fn list_blacklist_entries(&self, tenant_id: Uuid) -> Result<Vec<BlacklistEntry>, Self::Error>;
  fn purge_blacklist_entries(&mut self, tenant_id: Uuid) -> Result<(), Self::Error>;

  // ── Contracts ─────────────────────────────────────────────────────────

  fn insert_contract(&mut self, contract: &Contract) -> Result<(), Self::Error>;
  fn get_contract(&self, id: Uuid) -> Result<Option<Contract>, Self::Error>;
  fn list_contracts(&self) -> Result<Vec<Contract>, Self::Error>;
  fn update_contract(&mut self, contract: &Contract) -> Result<(), Self::Error>;
  fn delete_contract(&mut self, id: Uuid) -> Result<(), Self::Error>;
}
