//! Buildings: the top of the ownership graph.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::{ValidationError, validate};

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
pub enum BuildingStatus {
  #[default]
  Available,
  UnderRepair,
  Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
  pub building_id: Uuid,
  pub name:        String,
  pub address:     String,
  pub floors:      u32,
  /// Derived by the cost rollup: number of rooms in the building.
  pub room_count:  u32,
  /// Derived by the cost rollup: sum of the rooms' costs.
  pub cost:        Decimal,
  pub status:      BuildingStatus,
}

/// Input to [`crate::Bookkeeper::add_building`].
#[derive(Debug, Clone)]
pub struct NewBuilding {
  pub name:       String,
  pub address:    String,
  pub floors:     u32,
  /// Rooms created together with the building, named `"{name}-{i}"`.
  pub room_count: u32,
}

impl NewBuilding {
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate::required("building name", &self.name)?;
    validate::required("building address", &self.address)?;
    Ok(())
  }

  pub fn into_building(self) -> Building {
    Building {
      building_id: Uuid::new_v4(),
      name:        self.name.trim().to_owned(),
      address:     self.address.trim().to_owned(),
      floors:      self.floors,
      room_count:  0,
      cost:        Decimal::ZERO,
      status:      BuildingStatus::Available,
    }
  }
}

/// Names of the rooms created alongside a new building.
pub fn initial_room_names(building_name: &str, count: u32) -> Vec<String> {
  (1..=count).map(|i| format!("{building_name}-{i}")).collect()
}

#[derive(Debug, Clone)]
pub struct BuildingEdit {
  pub name:    String,
  pub address: String,
  pub floors:  u32,
  pub status:  BuildingStatus,
}

impl BuildingEdit {
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate::required("building name", &self.name)?;
    validate::required("building address", &self.address)?;
    Ok(())
  }

  /// Derived totals are left alone; the rollup owns them.
  pub fn apply(self, building: &mut Building) {
    building.name = self.name.trim().to_owned();
    building.address = self.address.trim().to_owned();
    building.floors = self.floors;
    building.status = self.status;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn room_names_are_numbered_from_one() {
    assert_eq!(initial_room_names("A栋", 3), ["A栋-1", "A栋-2", "A栋-3"]);
    assert!(initial_room_names("B", 0).is_empty());
  }

  #[test]
  fn blank_address_is_rejected() {
    let input = NewBuilding {
      name:       "A".into(),
      address:    "  ".into(),
      floors:     1,
      room_count: 0,
    };
    assert_eq!(
      input.validate(),
      Err(ValidationError::MissingField("building address"))
    );
  }
}
