//! Tenants and the blacklist log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ValidationError, linkage::Linkage, validate};

/// Identity and access details the operator keeps for a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
  pub name:             String,
  pub national_id:      Option<String>,
  pub phone:            Option<String>,
  /// Messaging-app handle (e.g. WeChat).
  pub messaging_handle: Option<String>,
  pub lock_id:          Option<String>,
  pub lock_password:    Option<String>,
  pub fingerprint:      Option<String>,
  pub note:             Option<String>,
}

impl TenantProfile {
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate::required("tenant name", &self.name)
  }

  fn normalized(self) -> Self {
    Self {
      name:             self.name.trim().to_owned(),
      national_id:      validate::optional_text(self.national_id),
      phone:            validate::optional_text(self.phone),
      messaging_handle: validate::optional_text(self.messaging_handle),
      lock_id:          validate::optional_text(self.lock_id),
      lock_password:    validate::optional_text(self.lock_password),
      fingerprint:      validate::optional_text(self.fingerprint),
      note:             validate::optional_text(self.note),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
  pub tenant_id:   Uuid,
  #[serde(flatten)]
  pub profile:     TenantProfile,
  pub blacklisted: bool,
  /// The contract this tenant is currently covered by, either as primary
  /// tenant or inherited from its main tenant.
  pub contract_id: Option<Uuid>,
  /// Co-tenancy grouping; assembled by the store from the link table.
  pub linkage:     Linkage,
}

/// Input to [`crate::Bookkeeper::add_tenant`].
#[derive(Debug, Clone, Default)]
pub struct NewTenant {
  pub profile:     TenantProfile,
  pub blacklisted: bool,
  /// Link the new tenant under this main tenant right away.
  pub main_tenant: Option<Uuid>,
}

impl NewTenant {
  pub fn validate(&self) -> Result<(), ValidationError> { self.profile.validate() }

  pub fn into_tenant(self) -> Tenant {
    Tenant {
      tenant_id:   Uuid::new_v4(),
      profile:     self.profile.normalized(),
      blacklisted: self.blacklisted,
      contract_id: None,
      linkage:     Linkage::Unlinked,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct TenantEdit {
  pub profile:     TenantProfile,
  pub blacklisted: bool,
}

impl TenantEdit {
  pub fn validate(&self) -> Result<(), ValidationError> { self.profile.validate() }

  /// Returns `true` when the edit newly blacklists the tenant.
  pub fn apply(self, tenant: &mut Tenant) -> bool {
    let newly_blacklisted = self.blacklisted && !tenant.blacklisted;
    tenant.profile = self.profile.normalized();
    tenant.blacklisted = self.blacklisted;
    newly_blacklisted
  }
}

/// A row in the append-only blacklist log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
  pub tenant_id:   Uuid,
  pub reason:      Option<String>,
  pub recorded_at: DateTime<Utc>,
}

impl BlacklistEntry {
  pub fn now(tenant_id: Uuid, reason: Option<String>) -> Self {
    Self {
      tenant_id,
      reason: validate::optional_text(reason),
      recorded_at: Utc::now(),
    }
  }
}
