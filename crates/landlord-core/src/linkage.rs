//! Co-tenancy: sub-tenants grouped under one main tenant.
//!
//! The relation is a tree of depth one. A main tenant cannot itself be a
//! sub-tenant, and a sub-tenant cannot have sub-tenants of its own. The
//! [`Linkage`] variant makes the three possible positions explicit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ValidationError, tenant::Tenant};

/// One row of the link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantLink {
  pub sub_tenant_id:  Uuid,
  pub main_tenant_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Linkage {
  #[default]
  Unlinked,
  Main { subs: Vec<Uuid> },
  SubTenantOf { main: Uuid },
}

impl Linkage {
  /// Position of `tenant_id` given the full set of link rows.
  pub fn from_links(tenant_id: Uuid, links: &[TenantLink]) -> Self {
    if let Some(link) = links.iter().find(|l| l.sub_tenant_id == tenant_id) {
      return Self::SubTenantOf { main: link.main_tenant_id };
    }
    let subs: Vec<Uuid> = links
      .iter()
      .filter(|l| l.main_tenant_id == tenant_id)
      .map(|l| l.sub_tenant_id)
      .collect();
    if subs.is_empty() { Self::Unlinked } else { Self::Main { subs } }
  }

  pub fn main(&self) -> Option<Uuid> {
    match self {
      Self::SubTenantOf { main } => Some(*main),
      _ => None,
    }
  }

  pub fn subs(&self) -> &[Uuid] {
    match self {
      Self::Main { subs } => subs,
      _ => &[],
    }
  }
}

/// Check that `sub` may be placed under `main`.
pub fn validate_link(sub: &Tenant, main: &Tenant) -> Result<(), ValidationError> {
  if sub.tenant_id == main.tenant_id {
    return Err(ValidationError::SelfLink);
  }
  match &sub.linkage {
    Linkage::SubTenantOf { main: current } => {
      return Err(ValidationError::AlreadyLinked {
        sub:  sub.tenant_id,
        main: *current,
      });
    }
    Linkage::Main { .. } => return Err(ValidationError::SubIsMain(sub.tenant_id)),
    Linkage::Unlinked => {}
  }
  if let Linkage::SubTenantOf { .. } = main.linkage {
    return Err(ValidationError::MainIsSub(main.tenant_id));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tenant::{NewTenant, TenantProfile};

  fn tenant(name: &str) -> Tenant {
    NewTenant {
      profile: TenantProfile { name: name.into(), ..Default::default() },
      ..Default::default()
    }
    .into_tenant()
  }

  #[test]
  fn from_links_resolves_each_position() {
    let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let links = [
      TenantLink { sub_tenant_id: b, main_tenant_id: a },
      TenantLink { sub_tenant_id: c, main_tenant_id: a },
    ];
    assert_eq!(Linkage::from_links(a, &links), Linkage::Main { subs: vec![b, c] });
    assert_eq!(Linkage::from_links(b, &links), Linkage::SubTenantOf { main: a });
    assert_eq!(Linkage::from_links(d, &links), Linkage::Unlinked);
  }

  #[test]
  fn rejects_chains_in_both_directions() {
    let mut a = tenant("A");
    let mut b = tenant("B");
    let c = tenant("C");
    a.linkage = Linkage::Main { subs: vec![b.tenant_id] };
    b.linkage = Linkage::SubTenantOf { main: a.tenant_id };

    assert_eq!(validate_link(&c, &b), Err(ValidationError::MainIsSub(b.tenant_id)));
    assert_eq!(validate_link(&a, &c), Err(ValidationError::SubIsMain(a.tenant_id)));
    assert_eq!(
      validate_link(&b, &a),
      Err(ValidationError::AlreadyLinked { sub: b.tenant_id, main: a.tenant_id })
    );
    assert_eq!(validate_link(&c, &c), Err(ValidationError::SelfLink));
    assert_eq!(validate_link(&c, &a), Ok(()));
  }
}
