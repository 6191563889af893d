//! Bottom-up recomputation of derived costs and counts.
//!
//! Furniture line totals feed room cost and furniture count, which feed
//! building cost and room count. Every derived field is recomputed from the
//! children that exist right now; nothing is patched incrementally, so the
//! pass is idempotent and safe to run after any write.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{ValidationError, building::Building, furniture::Furniture, room::Room, validate};

/// The three levels of the ownership graph, loaded together.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
  pub buildings: Vec<Building>,
  pub rooms:     Vec<Room>,
  pub furniture: Vec<Furniture>,
}

/// Records whose derived fields changed and need persisting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RollupChanges {
  pub buildings: Vec<Uuid>,
  pub rooms:     Vec<Uuid>,
  pub furniture: Vec<Uuid>,
}

impl RollupChanges {
  pub fn is_empty(&self) -> bool {
    self.buildings.is_empty() && self.rooms.is_empty() && self.furniture.is_empty()
  }
}

#[derive(Default)]
struct Tally {
  count: u32,
  cost:  Decimal,
}

/// Fails when a total no longer fits in a [`Decimal`].
pub fn recompute(portfolio: &mut Portfolio) -> Result<RollupChanges, ValidationError> {
  let mut changes = RollupChanges::default();

  let mut per_room: HashMap<Uuid, Tally> = HashMap::new();
  for item in &mut portfolio.furniture {
    let total = item.line_total()?;
    if item.total_cost != total {
      item.total_cost = total;
      changes.furniture.push(item.furniture_id);
    }
    if let Some(room_id) = item.room_id {
      let tally = per_room.entry(room_id).or_default();
      tally.count += 1;
      tally.cost = validate::checked_add("room cost", tally.cost, total)?;
    }
  }

  let mut per_building: HashMap<Uuid, Tally> = HashMap::new();
  for room in &mut portfolio.rooms {
    let tally = per_room.remove(&room.room_id).unwrap_or_default();
    if room.furniture_count != tally.count || room.cost != tally.cost {
      room.furniture_count = tally.count;
      room.cost = tally.cost;
      changes.rooms.push(room.room_id);
    }
    let parent = per_building.entry(room.building_id).or_default();
    parent.count += 1;
    parent.cost = validate::checked_add("building cost", parent.cost, room.cost)?;
  }

  for building in &mut portfolio.buildings {
    let tally = per_building.remove(&building.building_id).unwrap_or_default();
    if building.room_count != tally.count || building.cost != tally.cost {
      building.room_count = tally.count;
      building.cost = tally.cost;
      changes.buildings.push(building.building_id);
    }
  }

  tracing::debug!(
    buildings = changes.buildings.len(),
    rooms = changes.rooms.len(),
    furniture = changes.furniture.len(),
    "cost rollup recomputed"
  );
  Ok(changes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{building::NewBuilding, furniture::NewFurniture};

  fn portfolio() -> Portfolio {
    let building = NewBuilding {
      name:       "A".into(),
      address:    "1 Main St".into(),
      floors:     2,
      room_count: 0,
    }
    .into_building();
    let r1 = Room::vacant(building.building_id, "A-1".into());
    let r2 = Room::vacant(building.building_id, "A-2".into());
    let item = |room: Option<Uuid>, cost: i64, qty: u32| {
      NewFurniture {
        room_id:   room,
        name:      "item".into(),
        unit_cost: Decimal::from(cost),
        quantity:  qty,
        note:      None,
      }
      .into_furniture()
      .unwrap()
    };
    Portfolio {
      furniture: vec![
        item(Some(r1.room_id), 500, 2),
        item(Some(r1.room_id), 100, 1),
        item(Some(r2.room_id), 50, 4),
        item(None, 999, 1),
      ],
      rooms: vec![r1, r2],
      buildings: vec![building],
    }
  }

  #[test]
  fn rolls_costs_up_the_chain() {
    let mut p = portfolio();
    recompute(&mut p).unwrap();

    assert_eq!(p.rooms[0].furniture_count, 2);
    assert_eq!(p.rooms[0].cost, Decimal::from(1100));
    assert_eq!(p.rooms[1].furniture_count, 1);
    assert_eq!(p.rooms[1].cost, Decimal::from(200));
    assert_eq!(p.buildings[0].room_count, 2);
    assert_eq!(p.buildings[0].cost, Decimal::from(1300));
  }

  #[test]
  fn second_pass_changes_nothing() {
    let mut p = portfolio();
    let first = recompute(&mut p).unwrap();
    assert!(!first.is_empty());

    let snapshot = (p.buildings.clone(), p.rooms.clone(), p.furniture.clone());
    let second = recompute(&mut p).unwrap();
    assert!(second.is_empty());
    assert_eq!((p.buildings, p.rooms, p.furniture), snapshot);
  }

  #[test]
  fn stale_line_totals_are_repaired() {
    let mut p = portfolio();
    p.furniture[0].quantity = 3;
    let changes = recompute(&mut p).unwrap();
    assert!(changes.furniture.contains(&p.furniture[0].furniture_id));
    assert_eq!(p.furniture[0].total_cost, Decimal::from(1500));
    assert_eq!(p.buildings[0].cost, Decimal::from(1800));
  }

  #[test]
  fn removed_children_zero_the_parent() {
    let mut p = portfolio();
    recompute(&mut p).unwrap();
    p.furniture.clear();
    p.rooms.truncate(1);
    recompute(&mut p).unwrap();
    assert_eq!(p.rooms[0].cost, Decimal::ZERO);
    assert_eq!(p.rooms[0].furniture_count, 0);
    assert_eq!(p.buildings[0].room_count, 1);
    assert_eq!(p.buildings[0].cost, Decimal::ZERO);
  }

  #[test]
  fn overflowing_room_cost_is_an_error() {
    let mut p = portfolio();
    p.furniture[0].unit_cost = Decimal::MAX;
    p.furniture[0].quantity = 1;
    p.furniture[1].unit_cost = Decimal::MAX;
    assert_eq!(recompute(&mut p), Err(ValidationError::AmountTooLarge("room cost")));
  }
}
