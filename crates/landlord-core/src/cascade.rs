//! Deletion policy for the ownership graph.
//!
//! Buildings own rooms, rooms own furniture: deleting a parent deletes its
//! children. Contracts and tenants are cross-references, not owned; they are
//! detached rather than deleted. Deletions are never rejected. All cleanup
//! rules live here so the policy can be read and tested in one place; the
//! [`crate::Bookkeeper`] applies a plan atomically.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::{contract::Contract, furniture::Furniture, room::Room, tenant::Tenant};

/// The records a deletion reaches, borrowed from the store's current state.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
  pub rooms:     &'a [Room],
  pub furniture: &'a [Furniture],
  pub tenants:   &'a [Tenant],
  pub contracts: &'a [Contract],
}

/// Everything a single delete operation touches, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadePlan {
  /// Contracts whose room reference is cleared.
  pub detach_room:        Vec<Uuid>,
  /// Contracts whose primary-tenant reference is cleared.
  pub detach_tenant:      Vec<Uuid>,
  /// Tenants whose contract reference is cleared.
  pub clear_contract_ref: Vec<Uuid>,
  /// Sub-tenants whose link row is removed.
  pub unlink:             Vec<Uuid>,
  pub furniture:          Vec<Uuid>,
  pub rooms:              Vec<Uuid>,
  pub buildings:          Vec<Uuid>,
  pub contracts:          Vec<Uuid>,
  /// Tenants removed together with their blacklist log rows.
  pub tenants:            Vec<Uuid>,
}

impl CascadePlan {
  pub fn for_building(building_id: Uuid, snap: Snapshot<'_>) -> Self {
    let rooms: Vec<Uuid> = snap
      .rooms
      .iter()
      .filter(|r| r.building_id == building_id)
      .map(|r| r.room_id)
      .collect();
    let mut plan = Self::for_rooms(&rooms, snap);
    plan.buildings.push(building_id);
    plan
  }

  pub fn for_room(room_id: Uuid, snap: Snapshot<'_>) -> Self {
    Self::for_rooms(&[room_id], snap)
  }

  fn for_rooms(room_ids: &[Uuid], snap: Snapshot<'_>) -> Self {
    let owned: HashSet<Uuid> = room_ids.iter().copied().collect();
    Self {
      furniture: snap
        .furniture
        .iter()
        .filter(|f| f.room_id.is_some_and(|id| owned.contains(&id)))
        .map(|f| f.furniture_id)
        .collect(),
      detach_room: snap
        .contracts
        .iter()
        .filter(|c| c.room_id.is_some_and(|id| owned.contains(&id)))
        .map(|c| c.contract_id)
        .collect(),
      rooms: room_ids.to_vec(),
      ..Self::default()
    }
  }

  pub fn for_contract(contract_id: Uuid, snap: Snapshot<'_>) -> Self {
    Self {
      clear_contract_ref: snap
        .tenants
        .iter()
        .filter(|t| t.contract_id == Some(contract_id))
        .map(|t| t.tenant_id)
        .collect(),
      contracts: vec![contract_id],
      ..Self::default()
    }
  }

  /// Subs of a deleted main tenant become unlinked and lose the contract
  /// reference they inherited from it.
  pub fn for_tenant(tenant: &Tenant, snap: Snapshot<'_>) -> Self {
    let mut plan = Self {
      detach_tenant: snap
        .contracts
        .iter()
        .filter(|c| c.tenant_id == Some(tenant.tenant_id))
        .map(|c| c.contract_id)
        .collect(),
      tenants: vec![tenant.tenant_id],
      ..Self::default()
    };

    if tenant.linkage.main().is_some() {
      plan.unlink.push(tenant.tenant_id);
    }
    for sub_id in tenant.linkage.subs() {
      plan.unlink.push(*sub_id);
      let inherited = snap
        .tenants
        .iter()
        .find(|t| t.tenant_id == *sub_id)
        .is_some_and(|t| t.contract_id.is_some() && t.contract_id == tenant.contract_id);
      if inherited {
        plan.clear_contract_ref.push(*sub_id);
      }
    }
    plan
  }
}
