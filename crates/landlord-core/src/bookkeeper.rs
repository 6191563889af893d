//! The bookkeeping service.
//!
//! [`Bookkeeper`] owns a [`RentalStore`] and the [`Clock`], and is the only
//! place where validation, derivation and persistence meet. Every mutating
//! operation runs inside one [`RentalStore::atomically`] unit, so a failure
//! part-way leaves no partial writes behind.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Clock, Error, RecordKind, Result, ValidationError,
  building::{Building, BuildingEdit, NewBuilding, initial_room_names},
  cascade::{CascadePlan, Snapshot},
  contract::{Contract, ContractEdit, NewContract},
  furniture::{Furniture, NewFurniture},
  ledger::{self, RentReminder},
  lifecycle::{self, ContractStatus, TenantEffect, Transition},
  linkage::{TenantLink, validate_link},
  period::next_period,
  report::{Dashboard, Inputs},
  rollup::{self, Portfolio, RollupChanges},
  room::{NewRoom, Room, RoomEdit, RoomView},
  store::RentalStore,
  tenant::{BlacklistEntry, NewTenant, Tenant, TenantEdit},
  validate,
};

pub struct Bookkeeper<S> {
  store: S,
  clock: Clock,
}

impl<S> Bookkeeper<S> {
  pub fn new(store: S, clock: Clock) -> Self { Self { store, clock } }

  pub fn clock(&self) -> Clock { self.clock }

  /// Move the application date. Takes effect on the next derivation.
  pub fn set_today(&mut self, today: NaiveDate) {
    debug!(%today, "application date set");
    self.clock.set(today);
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn into_store(self) -> S { self.store }
}

impl<S> Bookkeeper<S>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  // ─── Buildings ─────────────────────────────────────────────────────────────

  /// Create a building together with `room_count` vacant rooms.
  pub fn add_building(&mut self, new: NewBuilding) -> Result<Building> {
    new.validate()?;
    let room_names = initial_room_names(new.name.trim(), new.room_count);
    let building = new.into_building();
    let id = building.building_id;

    let building = self.store.atomically(|store| {
      store.insert_building(&building)?;
      for name in room_names {
        store.insert_room(&Room::vacant(id, name))?;
      }
      rollup_costs(store)?;
      found(store.get_building(id)?, RecordKind::Building, id)
    })?;

    info!(building_id = %id, rooms = building.room_count, "added building");
    Ok(building)
  }

  pub fn edit_building(&mut self, id: Uuid, edit: BuildingEdit) -> Result<Building> {
    edit.validate()?;
    let building = self.store.atomically(|store| {
      let mut building = found(store.get_building(id)?, RecordKind::Building, id)?;
      edit.apply(&mut building);
      store.update_building(&building)?;
      rollup_costs(store)?;
      Ok(building)
    })?;
    info!(building_id = %id, "edited building");
    Ok(building)
  }

  /// Delete a building, its rooms and their furniture. Contracts on those
  /// rooms are kept with the room reference cleared.
  pub fn delete_building(&mut self, id: Uuid) -> Result<CascadePlan> {
    let plan = self.store.atomically(|store| {
      found(store.get_building(id)?, RecordKind::Building, id)?;
      let records = Records::load(store)?;
      let plan = CascadePlan::for_building(id, records.snapshot());
      apply_plan(store, &plan)?;
      rollup_costs(store)?;
      Ok(plan)
    })?;
    info!(
      building_id = %id,
      rooms = plan.rooms.len(),
      furniture = plan.furniture.len(),
      "deleted building"
    );
    Ok(plan)
  }

  pub fn list_buildings(&self) -> Result<Vec<Building>> { Ok(self.store.list_buildings()?) }

  // ─── Rooms ─────────────────────────────────────────────────────────────────

  pub fn add_room(&mut self, new: NewRoom) -> Result<Room> {
    new.validate()?;
    let room = new.into_room();
    let id = room.room_id;
    let room = self.store.atomically(|store| {
      found(store.get_building(room.building_id)?, RecordKind::Building, room.building_id)?;
      store.insert_room(&room)?;
      rollup_costs(store)?;
      found(store.get_room(id)?, RecordKind::Room, id)
    })?;
    info!(room_id = %id, building_id = %room.building_id, "added room");
    Ok(room)
  }

  pub fn edit_room(&mut self, id: Uuid, edit: RoomEdit) -> Result<Room> {
    edit.validate()?;
    let room = self.store.atomically(|store| {
      let mut room = found(store.get_room(id)?, RecordKind::Room, id)?;
      found(store.get_building(edit.building_id)?, RecordKind::Building, edit.building_id)?;
      edit.apply(&mut room);
      store.update_room(&room)?;
      rollup_costs(store)?;
      found(store.get_room(id)?, RecordKind::Room, id)
    })?;
    info!(room_id = %id, "edited room");
    Ok(room)
  }

  pub fn delete_room(&mut self, id: Uuid) -> Result<CascadePlan> {
    let plan = self.store.atomically(|store| {
      found(store.get_room(id)?, RecordKind::Room, id)?;
      let records = Records::load(store)?;
      let plan = CascadePlan::for_room(id, records.snapshot());
      apply_plan(store, &plan)?;
      rollup_costs(store)?;
      Ok(plan)
    })?;
    info!(room_id = %id, furniture = plan.furniture.len(), "deleted room");
    Ok(plan)
  }

  /// Rooms with their effective status and rent, ordered by building name
  /// then room name.
  pub fn list_rooms(&self) -> Result<Vec<RoomView>> {
    let buildings: HashMap<Uuid, String> = self
      .store
      .list_buildings()?
      .into_iter()
      .map(|b| (b.building_id, b.name))
      .collect();
    let contracts = self.store.list_contracts()?;

    let mut rooms = self.store.list_rooms()?;
    rooms.sort_by(|a, b| {
      let a_key = (buildings.get(&a.building_id), &a.name);
      let b_key = (buildings.get(&b.building_id), &b.name);
      a_key.cmp(&b_key)
    });
    Ok(rooms.into_iter().map(|r| RoomView::resolve(r, &contracts)).collect())
  }

  // ─── Furniture ─────────────────────────────────────────────────────────────

  pub fn add_furniture(&mut self, new: NewFurniture) -> Result<Furniture> {
    new.validate()?;
    let item = new.into_furniture()?;
    let id = item.furniture_id;
    let item = self.store.atomically(|store| {
      require_room(store, item.room_id)?;
      store.insert_furniture(&item)?;
      rollup_costs(store)?;
      found(store.get_furniture(id)?, RecordKind::Furniture, id)
    })?;
    info!(furniture_id = %id, total_cost = %item.total_cost, "added furniture");
    Ok(item)
  }

  pub fn edit_furniture(&mut self, id: Uuid, edit: NewFurniture) -> Result<Furniture> {
    edit.validate()?;
    let item = self.store.atomically(|store| {
      let mut item = found(store.get_furniture(id)?, RecordKind::Furniture, id)?;
      require_room(store, edit.room_id)?;
      edit.apply(&mut item)?;
      store.update_furniture(&item)?;
      rollup_costs(store)?;
      found(store.get_furniture(id)?, RecordKind::Furniture, id)
    })?;
    info!(furniture_id = %id, "edited furniture");
    Ok(item)
  }

  /// Copy an item, under a fresh id, into the same room.
  pub fn duplicate_furniture(&mut self, id: Uuid) -> Result<Furniture> {
    let copy = self.store.atomically(|store| {
      let original = found(store.get_furniture(id)?, RecordKind::Furniture, id)?;
      let copy = original.duplicate();
      store.insert_furniture(&copy)?;
      rollup_costs(store)?;
      Ok(copy)
    })?;
    info!(furniture_id = %id, copy_id = %copy.furniture_id, "duplicated furniture");
    Ok(copy)
  }

  pub fn delete_furniture(&mut self, id: Uuid) -> Result<()> {
    self.store.atomically(|store| {
      found(store.get_furniture(id)?, RecordKind::Furniture, id)?;
      store.delete_furniture(id)?;
      rollup_costs(store)?;
      Ok(())
    })?;
    info!(furniture_id = %id, "deleted furniture");
    Ok(())
  }

  pub fn list_furniture(&self) -> Result<Vec<Furniture>> { Ok(self.store.list_furniture()?) }

  // ─── Tenants ───────────────────────────────────────────────────────────────

  /// Register a tenant, optionally linking it under an existing main tenant.
  pub fn add_tenant(&mut self, new: NewTenant) -> Result<Tenant> {
    new.validate()?;
    let main_tenant = new.main_tenant;
    let blacklisted = new.blacklisted;
    let tenant = new.into_tenant();
    let id = tenant.tenant_id;

    let tenant = self.store.atomically(|store| {
      store.insert_tenant(&tenant)?;
      if blacklisted {
        store.append_blacklist_entry(&BlacklistEntry::now(id, None))?;
      }
      match main_tenant {
        Some(main_id) => link(store, id, main_id),
        None => Ok(tenant),
      }
    })?;
    info!(tenant_id = %id, main_tenant = ?main_tenant, "added tenant");
    Ok(tenant)
  }

  /// Overwrite a tenant's profile. Newly blacklisting a tenant here appends
  /// a log row without a reason.
  pub fn edit_tenant(&mut self, id: Uuid, edit: TenantEdit) -> Result<Tenant> {
    edit.validate()?;
    let tenant = self.store.atomically(|store| {
      let mut tenant = found(store.get_tenant(id)?, RecordKind::Tenant, id)?;
      let newly_blacklisted = edit.apply(&mut tenant);
      store.update_tenant(&tenant)?;
      if newly_blacklisted {
        store.append_blacklist_entry(&BlacklistEntry::now(id, None))?;
      }
      Ok(tenant)
    })?;
    info!(tenant_id = %id, "edited tenant");
    Ok(tenant)
  }

  /// Place `sub_id` under `main_id`. The sub-tenant inherits the main
  /// tenant's contract reference, so it must not hold an active contract of
  /// its own.
  pub fn link_tenant(&mut self, sub_id: Uuid, main_id: Uuid) -> Result<Tenant> {
    let sub = self.store.atomically(|store| link(store, sub_id, main_id))?;
    info!(sub_tenant = %sub_id, main_tenant = %main_id, "linked tenants");
    Ok(sub)
  }

  pub fn unlink_tenant(&mut self, sub_id: Uuid) -> Result<Tenant> {
    let sub = self.store.atomically(|store| {
      let mut sub = found(store.get_tenant(sub_id)?, RecordKind::Tenant, sub_id)?;
      if sub.linkage.main().is_none() {
        return Err(ValidationError::NotLinked(sub_id).into());
      }
      store.delete_link(sub_id)?;
      sub.contract_id = None;
      store.update_tenant(&sub)?;
      found(store.get_tenant(sub_id)?, RecordKind::Tenant, sub_id)
    })?;
    info!(sub_tenant = %sub_id, "unlinked tenant");
    Ok(sub)
  }

  pub fn blacklist_tenant(&mut self, id: Uuid, reason: Option<String>) -> Result<Tenant> {
    let tenant = self.store.atomically(|store| {
      let mut tenant = found(store.get_tenant(id)?, RecordKind::Tenant, id)?;
      tenant.blacklisted = true;
      store.update_tenant(&tenant)?;
      store.append_blacklist_entry(&BlacklistEntry::now(id, reason))?;
      Ok(tenant)
    })?;
    info!(tenant_id = %id, "blacklisted tenant");
    Ok(tenant)
  }

  /// Delete a tenant with its links and blacklist log. Contracts naming it
  /// as primary tenant are kept with the reference cleared.
  pub fn delete_tenant(&mut self, id: Uuid) -> Result<CascadePlan> {
    let plan = self.store.atomically(|store| {
      let tenant = found(store.get_tenant(id)?, RecordKind::Tenant, id)?;
      let records = Records::load(store)?;
      let plan = CascadePlan::for_tenant(&tenant, records.snapshot());
      apply_plan(store, &plan)?;
      Ok(plan)
    })?;
    info!(tenant_id = %id, unlinked = plan.unlink.len(), "deleted tenant");
    Ok(plan)
  }

  pub fn list_tenants(&self) -> Result<Vec<Tenant>> { Ok(self.store.list_tenants()?) }

  /// The blacklist log of one tenant, oldest first.
  pub fn blacklist_history(&self, id: Uuid) -> Result<Vec<BlacklistEntry>> {
    Ok(self.store.list_blacklist_entries(id)?)
  }

  // ─── Contracts ─────────────────────────────────────────────────────────────

  /// Create a contract. Its status is derived from the dates as of today,
  /// and an active contract immediately covers its tenant group.
  pub fn add_contract(&mut self, new: NewContract) -> Result<Contract> {
    new.validate()?;
    let today = self.clock.get();
    let contract = self.store.atomically(|store| {
      found(store.get_room(new.room_id)?, RecordKind::Room, new.room_id)?;
      found(store.get_tenant(new.tenant_id)?, RecordKind::Tenant, new.tenant_id)?;

      let contract = new.into_contract(today);
      if contract.status.is_active() {
        ensure_room_free(store, &contract)?;
        ensure_tenant_free(store, &contract)?;
      }
      store.insert_contract(&contract)?;
      apply_tenant_effect(store, &contract)?;
      Ok(contract)
    })?;
    info!(
      contract_id = %contract.contract_id,
      status = contract.status.as_ref(),
      "added contract"
    );
    Ok(contract)
  }

  /// Overwrite a contract's terms. The given status is stored as is, even
  /// where the dates would derive another one.
  pub fn edit_contract(&mut self, id: Uuid, edit: ContractEdit) -> Result<Contract> {
    edit.validate()?;
    let contract = self.store.atomically(|store| {
      let mut contract = found(store.get_contract(id)?, RecordKind::Contract, id)?;
      found(store.get_room(edit.room_id)?, RecordKind::Room, edit.room_id)?;
      found(store.get_tenant(edit.tenant_id)?, RecordKind::Tenant, edit.tenant_id)?;

      edit.apply(&mut contract)?;
      if contract.status.is_active() {
        ensure_room_free(store, &contract)?;
        ensure_tenant_free(store, &contract)?;
      }
      store.update_contract(&contract)?;
      apply_tenant_effect(store, &contract)?;
      Ok(contract)
    })?;
    info!(contract_id = %id, status = contract.status.as_ref(), "edited contract");
    Ok(contract)
  }

  /// Re-derive one contract's status from its dates, discarding any
  /// operator override.
  pub fn recompute_status(&mut self, id: Uuid) -> Result<Transition> {
    let today = self.clock.get();
    let transition = self.store.atomically(|store| {
      let mut contract = found(store.get_contract(id)?, RecordKind::Contract, id)?;
      let transition = lifecycle::recompute(&mut contract, today);
      store.update_contract(&contract)?;
      apply_tenant_effect(store, &contract)?;
      Ok(transition)
    })?;
    info!(
      contract_id = %id,
      from = transition.from.as_ref(),
      to = transition.to.as_ref(),
      "recomputed contract status"
    );
    Ok(transition)
  }

  /// Re-derive every contract except those the operator has ended. Returns
  /// the transitions that changed something.
  pub fn recompute_all_statuses(&mut self) -> Result<Vec<Transition>> {
    let today = self.clock.get();
    let transitions = self.store.atomically(|store| {
      let mut changed = Vec::new();
      for mut contract in store.list_contracts()? {
        if contract.status == ContractStatus::Ended {
          continue;
        }
        let transition = lifecycle::recompute(&mut contract, today);
        if transition.is_change() {
          store.update_contract(&contract)?;
          apply_tenant_effect(store, &contract)?;
          changed.push(transition);
        }
      }
      Ok(changed)
    })?;
    info!(%today, changed = transitions.len(), "recomputed contract statuses");
    Ok(transitions)
  }

  pub fn delete_contract(&mut self, id: Uuid) -> Result<CascadePlan> {
    let plan = self.store.atomically(|store| {
      found(store.get_contract(id)?, RecordKind::Contract, id)?;
      let records = Records::load(store)?;
      let plan = CascadePlan::for_contract(id, records.snapshot());
      apply_plan(store, &plan)?;
      Ok(plan)
    })?;
    info!(contract_id = %id, "deleted contract");
    Ok(plan)
  }

  pub fn list_contracts(&self) -> Result<Vec<Contract>> { Ok(self.store.list_contracts()?) }

  // ─── Ledger ────────────────────────────────────────────────────────────────

  /// Overwrite the paid-through date. This is the operator's record of a
  /// collection; nothing advances it automatically.
  pub fn set_paid_through(&mut self, id: Uuid, paid_through: NaiveDate) -> Result<Contract> {
    let contract = self.store.atomically(|store| {
      let mut contract = found(store.get_contract(id)?, RecordKind::Contract, id)?;
      contract.paid_through = Some(paid_through);
      store.update_contract(&contract)?;
      Ok(contract)
    })?;
    info!(contract_id = %id, %paid_through, "set paid-through date");
    Ok(contract)
  }

  /// Record collection of the next rent period: paid-through moves to the
  /// period end and one cadence worth of rent is added to the totals.
  pub fn collect_period(&mut self, id: Uuid) -> Result<Contract> {
    let contract = self.store.atomically(|store| {
      let mut contract = found(store.get_contract(id)?, RecordKind::Contract, id)?;
      let period =
        next_period(contract.start_date, contract.effective_paid_through(), contract.cadence);
      debug!(contract_id = %id, start = %period.start, end = %period.end, "collecting period");

      contract.paid_through = Some(period.end);
      contract.last_payment_date = Some(period.start);
      let due = validate::checked_mul(
        "period rent",
        contract.rent,
        Decimal::from(contract.cadence.months()),
      )?;
      contract.total_rent = validate::checked_add("total rent", contract.total_rent, due)?;
      contract.recompute_total_cash()?;
      store.update_contract(&contract)?;
      Ok(contract)
    })?;
    info!(
      contract_id = %id,
      total_rent = %contract.total_rent,
      "collected rent period"
    );
    Ok(contract)
  }

  /// Active contracts that are overdue or due within the reminder window.
  pub fn reminders(&self) -> Result<Vec<RentReminder>> {
    let records = Records::load(&self.store)?;
    Ok(ledger::reminders(
      &records.contracts,
      &records.rooms,
      &records.tenants,
      self.clock.get(),
    ))
  }

  // ─── Reporting ─────────────────────────────────────────────────────────────

  pub fn dashboard(&self) -> Result<Dashboard> {
    let buildings = self.store.list_buildings()?;
    let records = Records::load(&self.store)?;
    let dashboard = Dashboard::build(
      Inputs {
        buildings: &buildings,
        rooms:     &records.rooms,
        tenants:   &records.tenants,
        contracts: &records.contracts,
      },
      self.clock.get(),
    )?;
    debug!(
      as_of = %dashboard.as_of,
      reminders = dashboard.reminders.len(),
      expiring = dashboard.expiring.len(),
      "built dashboard"
    );
    Ok(dashboard)
  }

  /// Recompute every derived cost and count, persisting what changed.
  pub fn rollup_costs(&mut self) -> Result<RollupChanges> {
    self.store.atomically(|store| rollup_costs(store))
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn found<T>(row: Option<T>, kind: RecordKind, id: Uuid) -> Result<T> {
  row.ok_or_else(|| Error::not_found(kind, id))
}

fn require_room<S>(store: &S, room_id: Option<Uuid>) -> Result<()>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  if let Some(id) = room_id {
    found(store.get_room(id)?, RecordKind::Room, id)?;
  }
  Ok(())
}

/// Every record a cascade or report may reach.
struct Records {
  rooms:     Vec<Room>,
  furniture: Vec<Furniture>,
  tenants:   Vec<Tenant>,
  contracts: Vec<Contract>,
}

impl Records {
  fn load<S>(store: &S) -> Result<Self>
  where
    S: RentalStore,
    Error: From<S::Error>,
  {
    Ok(Self {
      rooms:     store.list_rooms()?,
      furniture: store.list_furniture()?,
      tenants:   store.list_tenants()?,
      contracts: store.list_contracts()?,
    })
  }

  fn snapshot(&self) -> Snapshot<'_> {
    Snapshot {
      rooms:     &self.rooms,
      furniture: &self.furniture,
      tenants:   &self.tenants,
      contracts: &self.contracts,
    }
  }
}

fn rollup_costs<S>(store: &mut S) -> Result<RollupChanges>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  let mut portfolio = Portfolio {
    buildings: store.list_buildings()?,
    rooms:     store.list_rooms()?,
    furniture: store.list_furniture()?,
  };
  let changes = rollup::recompute(&mut portfolio)?;

  for item in &portfolio.furniture {
    if changes.furniture.contains(&item.furniture_id) {
      store.update_furniture(item)?;
    }
  }
  for room in &portfolio.rooms {
    if changes.rooms.contains(&room.room_id) {
      store.update_room(room)?;
    }
  }
  for building in &portfolio.buildings {
    if changes.buildings.contains(&building.building_id) {
      store.update_building(building)?;
    }
  }
  Ok(changes)
}

/// A contract may only become active on a room no other active contract
/// covers.
fn ensure_room_free<S>(store: &S, contract: &Contract) -> Result<()>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  let Some(room_id) = contract.room_id else {
    return Ok(());
  };
  let occupant = store.list_contracts()?.into_iter().find(|c| {
    c.room_id == Some(room_id)
      && c.status.is_active()
      && c.contract_id != contract.contract_id
  });
  match occupant {
    Some(other) => Err(
      ValidationError::RoomOccupied { room: room_id, contract: other.contract_id }.into(),
    ),
    None => Ok(()),
  }
}

/// A tenant holds at most one active contract, whether as its primary tenant
/// or through the group it belongs to.
fn ensure_tenant_free<S>(store: &S, contract: &Contract) -> Result<()>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  let Some(tenant_id) = contract.tenant_id else {
    return Ok(());
  };
  let tenant = found(store.get_tenant(tenant_id)?, RecordKind::Tenant, tenant_id)?;
  match active_contract_of(store, &tenant, Some(contract.contract_id))? {
    Some(other) => Err(
      ValidationError::TenantOccupied { tenant: tenant_id, contract: other }.into(),
    ),
    None => Ok(()),
  }
}

/// The active contract `tenant` is primary on or covered by, other than
/// `except`.
fn active_contract_of<S>(
  store: &S,
  tenant: &Tenant,
  except: Option<Uuid>,
) -> Result<Option<Uuid>>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  let held = store.list_contracts()?.into_iter().find(|c| {
    c.status.is_active()
      && Some(c.contract_id) != except
      && (c.tenant_id == Some(tenant.tenant_id) || tenant.contract_id == Some(c.contract_id))
  });
  Ok(held.map(|c| c.contract_id))
}

fn link<S>(store: &mut S, sub_id: Uuid, main_id: Uuid) -> Result<Tenant>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  let mut sub = found(store.get_tenant(sub_id)?, RecordKind::Tenant, sub_id)?;
  let main = found(store.get_tenant(main_id)?, RecordKind::Tenant, main_id)?;
  validate_link(&sub, &main)?;
  if let Some(contract) = active_contract_of(store, &sub, None)? {
    return Err(ValidationError::TenantOccupied { tenant: sub_id, contract }.into());
  }

  store.insert_link(&TenantLink { sub_tenant_id: sub_id, main_tenant_id: main_id })?;
  sub.contract_id = main.contract_id;
  store.update_tenant(&sub)?;
  found(store.get_tenant(sub_id)?, RecordKind::Tenant, sub_id)
}

/// Bring the tenants' contract references in line with the contract's
/// status. Stale references (e.g. a replaced primary tenant) are cleared
/// first in both cases.
fn apply_tenant_effect<S>(store: &mut S, contract: &Contract) -> Result<()>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  let effect = lifecycle::tenant_effect(contract);
  for mut tenant in store.list_tenants()? {
    if tenant.contract_id == Some(contract.contract_id) {
      tenant.contract_id = None;
      store.update_tenant(&tenant)?;
    }
  }

  if let TenantEffect::Attach { contract_id, tenant_id } = effect {
    let mut primary = found(store.get_tenant(tenant_id)?, RecordKind::Tenant, tenant_id)?;
    primary.contract_id = Some(contract_id);
    store.update_tenant(&primary)?;
    for sub_id in primary.linkage.subs() {
      let mut sub = found(store.get_tenant(*sub_id)?, RecordKind::Tenant, *sub_id)?;
      sub.contract_id = Some(contract_id);
      store.update_tenant(&sub)?;
    }
  }
  debug!(contract_id = %contract.contract_id, ?effect, "applied tenant effect");
  Ok(())
}

fn apply_plan<S>(store: &mut S, plan: &CascadePlan) -> Result<()>
where
  S: RentalStore,
  Error: From<S::Error>,
{
  for id in &plan.detach_room {
    let mut contract = found(store.get_contract(*id)?, RecordKind::Contract, *id)?;
    contract.room_id = None;
    store.update_contract(&contract)?;
  }
  for id in &plan.detach_tenant {
    let mut contract = found(store.get_contract(*id)?, RecordKind::Contract, *id)?;
    contract.tenant_id = None;
    store.update_contract(&contract)?;
  }
  for id in &plan.clear_contract_ref {
    let mut tenant = found(store.get_tenant(*id)?, RecordKind::Tenant, *id)?;
    tenant.contract_id = None;
    store.update_tenant(&tenant)?;
  }
  for id in &plan.unlink {
    store.delete_link(*id)?;
  }
  for id in &plan.furniture {
    store.delete_furniture(*id)?;
  }
  for id in &plan.rooms {
    store.delete_room(*id)?;
  }
  for id in &plan.buildings {
    store.delete_building(*id)?;
  }
  for id in &plan.contracts {
    store.delete_contract(*id)?;
  }
  for id in &plan.tenants {
    store.purge_blacklist_entries(*id)?;
    store.delete_tenant(*id)?;
  }
  debug!(?plan, "applied cascade plan");
  Ok(())
}
