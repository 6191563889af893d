//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use landlord_core::{
  building::BuildingStatus, lifecycle::ContractStatus, period::Cadence, room::RoomStatus,
  tenant::TenantProfile,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "landlord", version, about = "Bookkeeping for a small rental business")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "landlord.toml")]
  pub config: PathBuf,

  /// Application date (YYYY-MM-DD) for every status and reminder
  /// computation. Defaults to the configured date, then the local date.
  #[arg(long, global = true, value_name = "DATE")]
  pub today: Option<NaiveDate>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Portfolio summary, lease expiries and rent reminders.
  Dashboard,
  #[command(subcommand)]
  Building(BuildingCommand),
  #[command(subcommand)]
  Room(RoomCommand),
  #[command(subcommand)]
  Furniture(FurnitureCommand),
  #[command(subcommand)]
  Tenant(TenantCommand),
  #[command(subcommand)]
  Contract(ContractCommand),
  #[command(subcommand)]
  Ledger(LedgerCommand),
  /// Recompute every derived cost and count.
  Rollup,
}

// ─── Buildings ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum BuildingCommand {
  /// Add a building and its numbered rooms.
  Add {
    name:    String,
    address: String,
    #[arg(long, default_value_t = 1)]
    floors:  u32,
    /// Rooms to create, named "{name}-{i}".
    #[arg(long, default_value_t = 0)]
    rooms:   u32,
  },
  /// Change a building's details; omitted fields keep their value.
  Edit {
    id:      Uuid,
    #[arg(long)]
    name:    Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    floors:  Option<u32>,
    #[arg(long)]
    status:  Option<BuildingStatus>,
  },
  List,
  /// Delete a building with its rooms and their furniture.
  Delete { id: Uuid },
}

// ─── Rooms ───────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum RoomCommand {
  Add {
    building: Uuid,
    name:     String,
    #[arg(long, default_value_t = 0.0)]
    area:     f64,
    #[arg(long, default_value_t = Decimal::ZERO)]
    rent:     Decimal,
    #[arg(long, default_value = "vacant")]
    status:   RoomStatus,
  },
  Edit {
    id:       Uuid,
    #[arg(long)]
    building: Option<Uuid>,
    #[arg(long)]
    name:     Option<String>,
    #[arg(long)]
    area:     Option<f64>,
    #[arg(long)]
    rent:     Option<Decimal>,
    #[arg(long)]
    status:   Option<RoomStatus>,
  },
  /// Rooms with effective status and rent.
  List,
  Delete { id: Uuid },
}

// ─── Furniture ───────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct FurnitureFields {
  /// Room the item sits in; omit for storage.
  #[arg(long)]
  pub room:      Option<Uuid>,
  #[arg(long)]
  pub name:      String,
  #[arg(long)]
  pub unit_cost: Decimal,
  #[arg(long, default_value_t = 1)]
  pub quantity:  u32,
  #[arg(long)]
  pub note:      Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FurnitureCommand {
  Add(FurnitureFields),
  Edit {
    id:     Uuid,
    #[command(flatten)]
    fields: FurnitureFields,
  },
  /// Copy an item into the same room.
  Copy { id: Uuid },
  List,
  Delete { id: Uuid },
}

// ─── Tenants ─────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ProfileFields {
  #[arg(long)]
  pub name:             String,
  #[arg(long)]
  pub national_id:      Option<String>,
  #[arg(long)]
  pub phone:            Option<String>,
  #[arg(long)]
  pub messaging_handle: Option<String>,
  #[arg(long)]
  pub lock_id:          Option<String>,
  #[arg(long)]
  pub lock_password:    Option<String>,
  #[arg(long)]
  pub fingerprint:      Option<String>,
  #[arg(long)]
  pub note:             Option<String>,
}

impl From<ProfileFields> for TenantProfile {
  fn from(f: ProfileFields) -> Self {
    Self {
      name:             f.name,
      national_id:      f.national_id,
      phone:            f.phone,
      messaging_handle: f.messaging_handle,
      lock_id:          f.lock_id,
      lock_password:    f.lock_password,
      fingerprint:      f.fingerprint,
      note:             f.note,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum TenantCommand {
  Add {
    #[command(flatten)]
    profile:     ProfileFields,
    #[arg(long)]
    blacklisted: bool,
    /// Link the new tenant under this main tenant.
    #[arg(long)]
    main:        Option<Uuid>,
  },
  /// Replace a tenant's profile.
  Edit {
    id:          Uuid,
    #[command(flatten)]
    profile:     ProfileFields,
    #[arg(long)]
    blacklisted: bool,
  },
  Link { sub: Uuid, main: Uuid },
  Unlink { sub: Uuid },
  Blacklist {
    id:     Uuid,
    #[arg(long)]
    reason: Option<String>,
  },
  List,
  /// Show a tenant's blacklist log.
  History { id: Uuid },
  Delete { id: Uuid },
}

// ─── Contracts ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum ContractCommand {
  Add {
    room:    Uuid,
    tenant:  Uuid,
    #[arg(long)]
    start:   NaiveDate,
    #[arg(long)]
    end:     Option<NaiveDate>,
    #[arg(long)]
    rent:    Decimal,
    #[arg(long, default_value_t = Decimal::ZERO)]
    deposit: Decimal,
    #[arg(long, default_value = "monthly")]
    cadence: Cadence,
    #[arg(long)]
    note:    Option<String>,
  },
  /// Change a contract; omitted fields keep their value. A given status is
  /// stored as is.
  Edit {
    id:         Uuid,
    #[arg(long)]
    room:       Option<Uuid>,
    #[arg(long)]
    tenant:     Option<Uuid>,
    #[arg(long)]
    start:      Option<NaiveDate>,
    #[arg(long)]
    end:        Option<NaiveDate>,
    /// Remove the end date.
    #[arg(long, conflicts_with = "end")]
    open_ended: bool,
    #[arg(long)]
    rent:       Option<Decimal>,
    #[arg(long)]
    deposit:    Option<Decimal>,
    #[arg(long)]
    cadence:    Option<Cadence>,
    #[arg(long)]
    status:     Option<ContractStatus>,
    #[arg(long)]
    total_rent: Option<Decimal>,
    #[arg(long)]
    note:       Option<String>,
  },
  List,
  Delete { id: Uuid },
  /// Re-derive status from the dates; every contract when no id is given.
  Recompute { id: Option<Uuid> },
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
  /// Overwrite a contract's paid-through date.
  Set { id: Uuid, paid_through: NaiveDate },
  /// Record collection of the next rent period.
  Collect { id: Uuid },
  Reminders,
}
