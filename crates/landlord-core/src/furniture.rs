//! Furniture items, the leaves of the ownership graph.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ValidationError, validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
  pub furniture_id: Uuid,
  /// `None` for items not (or no longer) placed in a room.
  pub room_id:      Option<Uuid>,
  pub name:         String,
  pub unit_cost:    Decimal,
  pub quantity:     u32,
  /// Derived: `quantity × unit_cost`.
  pub total_cost:   Decimal,
  pub note:         Option<String>,
}

impl Furniture {
  pub fn line_total(&self) -> Result<Decimal, ValidationError> {
    validate::checked_mul("furniture total", self.unit_cost, Decimal::from(self.quantity))
  }

  /// A copy with a fresh identifier, placed in the same room.
  pub fn duplicate(&self) -> Self {
    Self { furniture_id: Uuid::new_v4(), ..self.clone() }
  }
}

/// Input to both [`crate::Bookkeeper::add_furniture`] and
/// [`crate::Bookkeeper::edit_furniture`].
#[derive(Debug, Clone)]
pub struct NewFurniture {
  pub room_id:   Option<Uuid>,
  pub name:      String,
  pub unit_cost: Decimal,
  pub quantity:  u32,
  pub note:      Option<String>,
}

impl NewFurniture {
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate::required("furniture name", &self.name)?;
    validate::amount("unit cost", self.unit_cost)?;
    if self.quantity == 0 {
      return Err(ValidationError::ZeroQuantity);
    }
    let total = validate::checked_mul("furniture total", self.unit_cost, self.quantity.into())?;
    validate::amount("furniture total", total)
  }

  pub fn into_furniture(self) -> Result<Furniture, ValidationError> {
    let mut item = Furniture {
      furniture_id: Uuid::new_v4(),
      room_id:      None,
      name:         String::new(),
      unit_cost:    Decimal::ZERO,
      quantity:     0,
      total_cost:   Decimal::ZERO,
      note:         None,
    };
    self.apply(&mut item)?;
    Ok(item)
  }

  pub fn apply(self, item: &mut Furniture) -> Result<(), ValidationError> {
    item.room_id = self.room_id;
    item.name = self.name.trim().to_owned();
    item.unit_cost = self.unit_cost;
    item.quantity = self.quantity;
    item.note = validate::optional_text(self.note);
    item.total_cost = item.line_total()?;
    Ok(())
  }
}
