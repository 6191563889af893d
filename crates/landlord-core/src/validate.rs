//! Field checks shared by the `New*` / `*Edit` input types.

use rust_decimal::Decimal;

use crate::ValidationError;

/// Largest amount accepted for any single money field.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

pub(crate) fn required(
  field: &'static str,
  value: &str,
) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::MissingField(field));
  }
  Ok(())
}

/// A money amount in `0..=MAX_AMOUNT`.
pub(crate) fn amount(
  field: &'static str,
  value: Decimal,
) -> Result<(), ValidationError> {
  if value < Decimal::ZERO {
    return Err(ValidationError::NegativeAmount(field));
  }
  if value > MAX_AMOUNT {
    return Err(ValidationError::AmountTooLarge(field));
  }
  Ok(())
}

pub(crate) fn checked_add(
  field: &'static str,
  a: Decimal,
  b: Decimal,
) -> Result<Decimal, ValidationError> {
  a.checked_add(b).ok_or(ValidationError::AmountTooLarge(field))
}

pub(crate) fn checked_mul(
  field: &'static str,
  a: Decimal,
  b: Decimal,
) -> Result<Decimal, ValidationError> {
  a.checked_mul(b).ok_or(ValidationError::AmountTooLarge(field))
}

pub(crate) fn checked_sum(
  field: &'static str,
  values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, ValidationError> {
  values
    .into_iter()
    .try_fold(Decimal::ZERO, |acc, v| checked_add(field, acc, v))
}

/// Trim free-text fields; blank input is stored as `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn max_amount_is_one_trillion() {
    assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
    assert_eq!(amount("rent", MAX_AMOUNT), Ok(()));
    assert_eq!(
      amount("rent", MAX_AMOUNT + Decimal::ONE),
      Err(ValidationError::AmountTooLarge("rent"))
    );
  }

  #[test]
  fn overflowing_sum_is_an_error() {
    assert_eq!(
      checked_sum("cost", [Decimal::MAX, Decimal::ONE]),
      Err(ValidationError::AmountTooLarge("cost"))
    );
    assert_eq!(checked_sum("cost", Vec::new()), Ok(Decimal::ZERO));
  }
}
