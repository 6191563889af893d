//! Rooms and their effective (contract-aware) status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::{ValidationError, contract::Contract, validate};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomStatus {
  #[default]
  Vacant,
  Rented,
  UnderRepair,
  Unavailable,
  SelfOccupied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
  pub room_id:         Uuid,
  pub building_id:     Uuid,
  pub name:            String,
  pub area:            f64,
  /// Derived by the cost rollup.
  pub furniture_count: u32,
  /// Derived by the cost rollup: sum of the furniture line totals.
  pub cost:            Decimal,
  /// Nominal monthly rent, shown when no active contract overrides it.
  pub rent:            Decimal,
  /// Status as last set by the operator.
  pub status:          RoomStatus,
}

impl Room {
  /// A freshly numbered vacant room, as created alongside a building.
  pub fn vacant(building_id: Uuid, name: String) -> Self {
    Self {
      room_id: Uuid::new_v4(),
      building_id,
      name,
      area: 0.0,
      furniture_count: 0,
      cost: Decimal::ZERO,
      rent: Decimal::ZERO,
      status: RoomStatus::Vacant,
    }
  }
}

#[derive(Debug, Clone)]
pub struct NewRoom {
  pub building_id: Uuid,
  pub name:        String,
  pub area:        f64,
  pub rent:        Decimal,
  pub status:      RoomStatus,
}

impl NewRoom {
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate::required("room name", &self.name)?;
    validate::amount("room rent", self.rent)?;
    if self.area < 0.0 {
      return Err(ValidationError::NegativeAmount("room area"));
    }
    Ok(())
  }

  pub fn into_room(self) -> Room {
    Room {
      rent: self.rent,
      area: self.area,
      status: self.status,
      ..Room::vacant(self.building_id, self.name.trim().to_owned())
    }
  }
}

/// Editable room fields; same shape as [`NewRoom`].
pub type RoomEdit = NewRoom;

impl RoomEdit {
  pub fn apply(self, room: &mut Room) {
    room.building_id = self.building_id;
    room.name = self.name.trim().to_owned();
    room.area = self.area;
    room.rent = self.rent;
    room.status = self.status;
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A room as listed to the operator, with contract-derived fields resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomView {
  pub room:             Room,
  /// `Rented` iff an active contract covers the room.
  pub effective_status: RoomStatus,
  /// The active contract's rent, else the room's nominal rent.
  pub effective_rent:   Decimal,
  pub active_contract:  Option<Uuid>,
}

impl RoomView {
  pub fn resolve(room: Room, contracts: &[Contract]) -> Self {
    let active = contracts
      .iter()
      .find(|c| c.room_id == Some(room.room_id) && c.status.is_active());

    let effective_status = match (active, room.status) {
      (Some(_), _) => RoomStatus::Rented,
      (None, RoomStatus::Rented) => RoomStatus::Vacant,
      (None, status) => status,
    };

    Self {
      effective_rent: active.map_or(room.rent, |c| c.rent),
      active_contract: active.map(|c| c.contract_id),
      effective_status,
      room,
    }
  }
}
