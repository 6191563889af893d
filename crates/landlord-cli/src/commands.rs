//! Dispatch of parsed commands onto the [`Bookkeeper`].

use anyhow::{Context as _, Result};
use landlord_core::{
  Bookkeeper,
  building::{BuildingEdit, NewBuilding},
  contract::{ContractEdit, NewContract},
  furniture::NewFurniture,
  room::{NewRoom, RoomEdit},
  store::RentalStore,
  tenant::{NewTenant, TenantEdit},
};
use landlord_store_sqlite::SqliteStore;
use serde::Serialize;

use crate::args::{
  BuildingCommand, Command, ContractCommand, FurnitureCommand, FurnitureFields, LedgerCommand,
  RoomCommand, TenantCommand,
};

type Keeper = Bookkeeper<SqliteStore>;

fn print_json(value: &impl Serialize) -> Result<()> {
  let out = serde_json::to_string_pretty(value).context("failed to serialise output")?;
  println!("{out}");
  Ok(())
}

pub fn run(keeper: &mut Keeper, command: Command) -> Result<()> {
  match command {
    Command::Dashboard => print_json(&keeper.dashboard()?),
    Command::Building(cmd) => building(keeper, cmd),
    Command::Room(cmd) => room(keeper, cmd),
    Command::Furniture(cmd) => furniture(keeper, cmd),
    Command::Tenant(cmd) => tenant(keeper, cmd),
    Command::Contract(cmd) => contract(keeper, cmd),
    Command::Ledger(cmd) => ledger(keeper, cmd),
    Command::Rollup => print_json(&keeper.rollup_costs()?),
  }
}

fn building(keeper: &mut Keeper, cmd: BuildingCommand) -> Result<()> {
  match cmd {
    BuildingCommand::Add { name, address, floors, rooms } => {
      let new = NewBuilding { name, address, floors, room_count: rooms };
      print_json(&keeper.add_building(new)?)
    }
    BuildingCommand::Edit { id, name, address, floors, status } => {
      let current = keeper
        .store()
        .get_building(id)?
        .with_context(|| format!("building {id} not found"))?;
      let edit = BuildingEdit {
        name:    name.unwrap_or(current.name),
        address: address.unwrap_or(current.address),
        floors:  floors.unwrap_or(current.floors),
        status:  status.unwrap_or(current.status),
      };
      print_json(&keeper.edit_building(id, edit)?)
    }
    BuildingCommand::List => print_json(&keeper.list_buildings()?),
    BuildingCommand::Delete { id } => print_json(&keeper.delete_building(id)?),
  }
}

fn room(keeper: &mut Keeper, cmd: RoomCommand) -> Result<()> {
  match cmd {
    RoomCommand::Add { building, name, area, rent, status } => {
      let new = NewRoom { building_id: building, name, area, rent, status };
      print_json(&keeper.add_room(new)?)
    }
    RoomCommand::Edit { id, building, name, area, rent, status } => {
      let current = keeper
        .store()
        .get_room(id)?
        .with_context(|| format!("room {id} not found"))?;
      let edit = RoomEdit {
        building_id: building.unwrap_or(current.building_id),
        name:        name.unwrap_or(current.name),
        area:        area.unwrap_or(current.area),
        rent:        rent.unwrap_or(current.rent),
        status:      status.unwrap_or(current.status),
      };
      print_json(&keeper.edit_room(id, edit)?)
    }
    RoomCommand::List => print_json(&keeper.list_rooms()?),
    RoomCommand::Delete { id } => print_json(&keeper.delete_room(id)?),
  }
}

fn furniture_input(fields: FurnitureFields) -> NewFurniture {
  NewFurniture {
    room_id:   fields.room,
    name:      fields.name,
    unit_cost: fields.unit_cost,
    quantity:  fields.quantity,
    note:      fields.note,
  }
}

fn furniture(keeper: &mut Keeper, cmd: FurnitureCommand) -> Result<()> {
  match cmd {
    FurnitureCommand::Add(fields) => print_json(&keeper.add_furniture(furniture_input(fields))?),
    FurnitureCommand::Edit { id, fields } => {
      print_json(&keeper.edit_furniture(id, furniture_input(fields))?)
    }
    FurnitureCommand::Copy { id } => print_json(&keeper.duplicate_furniture(id)?),
    FurnitureCommand::List => print_json(&keeper.list_furniture()?),
    FurnitureCommand::Delete { id } => {
      keeper.delete_furniture(id)?;
      print_json(&serde_json::json!({ "deleted": id }))
    }
  }
}

fn tenant(keeper: &mut Keeper, cmd: TenantCommand) -> Result<()> {
  match cmd {
    TenantCommand::Add { profile, blacklisted, main } => {
      let new = NewTenant { profile: profile.into(), blacklisted, main_tenant: main };
      print_json(&keeper.add_tenant(new)?)
    }
    TenantCommand::Edit { id, profile, blacklisted } => {
      let edit = TenantEdit { profile: profile.into(), blacklisted };
      print_json(&keeper.edit_tenant(id, edit)?)
    }
    TenantCommand::Link { sub, main } => print_json(&keeper.link_tenant(sub, main)?),
    TenantCommand::Unlink { sub } => print_json(&keeper.unlink_tenant(sub)?),
    TenantCommand::Blacklist { id, reason } => print_json(&keeper.blacklist_tenant(id, reason)?),
    TenantCommand::List => print_json(&keeper.list_tenants()?),
    TenantCommand::History { id } => print_json(&keeper.blacklist_history(id)?),
    TenantCommand::Delete { id } => print_json(&keeper.delete_tenant(id)?),
  }
}

fn contract(keeper: &mut Keeper, cmd: ContractCommand) -> Result<()> {
  match cmd {
    ContractCommand::Add { room, tenant, start, end, rent, deposit, cadence, note } => {
      let new = NewContract {
        room_id: room,
        tenant_id: tenant,
        start_date: start,
        end_date: end,
        rent,
        deposit,
        cadence,
        note,
      };
      print_json(&keeper.add_contract(new)?)
    }
    ContractCommand::Edit {
      id,
      room,
      tenant,
      start,
      end,
      open_ended,
      rent,
      deposit,
      cadence,
      status,
      total_rent,
      note,
    } => {
      let current = keeper
        .store()
        .get_contract(id)?
        .with_context(|| format!("contract {id} not found"))?;
      let room_id = room
        .or(current.room_id)
        .with_context(|| format!("contract {id} has no room; pass --room"))?;
      let tenant_id = tenant
        .or(current.tenant_id)
        .with_context(|| format!("contract {id} has no tenant; pass --tenant"))?;
      let edit = ContractEdit {
        room_id,
        tenant_id,
        start_date: start.unwrap_or(current.start_date),
        end_date: if open_ended { None } else { end.or(current.end_date) },
        rent: rent.unwrap_or(current.rent),
        deposit: deposit.unwrap_or(current.deposit),
        cadence: cadence.unwrap_or(current.cadence),
        status: status.unwrap_or(current.status),
        total_rent: total_rent.unwrap_or(current.total_rent),
        note: note.or(current.note),
      };
      print_json(&keeper.edit_contract(id, edit)?)
    }
    ContractCommand::List => print_json(&keeper.list_contracts()?),
    ContractCommand::Delete { id } => print_json(&keeper.delete_contract(id)?),
    ContractCommand::Recompute { id: Some(id) } => print_json(&keeper.recompute_status(id)?),
    ContractCommand::Recompute { id: None } => print_json(&keeper.recompute_all_statuses()?),
  }
}

fn ledger(keeper: &mut Keeper, cmd: LedgerCommand) -> Result<()> {
  match cmd {
    LedgerCommand::Set { id, paid_through } => {
      print_json(&keeper.set_paid_through(id, paid_through)?)
    }
    LedgerCommand::Collect { id } => print_json(&keeper.collect_period(id)?),
    LedgerCommand::Reminders => print_json(&keeper.reminders()?),
  }
}
