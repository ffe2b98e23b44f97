//! Money - a two-digit fixed-point amount.
//!
//! SQLite keeps money columns as `REAL`, so a value read back carries whatever scale the
//! float conversion produced (`200`, `0.1`). `Money` rescales to exactly two fractional
//! digits on every construction, including the database read path.

use rust_decimal::Decimal;
use sea_orm::sea_query::{ArrayType, ColumnType, Nullable, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, QueryResult, TryGetError, TryGetable, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits carried by every amount.
pub const MONEY_SCALE: u32 = 2;

/// A monetary amount with exactly two fractional digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero, as `0.00`.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        let mut rounded = value.round_dp(MONEY_SCALE);
        rounded.rescale(MONEY_SCALE);
        Self(rounded)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Money> for Value {
    fn from(money: Money) -> Self {
        money.0.into()
    }
}

impl TryGetable for Money {
    fn try_get_by<I: ColIdx>(res: &QueryResult, idx: I) -> Result<Self, TryGetError> {
        <Decimal as TryGetable>::try_get_by(res, idx).map(Self::from)
    }
}

impl ValueType for Money {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        <Decimal as ValueType>::try_from(v).map(Self::from)
    }

    fn type_name() -> String {
        "Money".to_owned()
    }

    fn array_type() -> ArrayType {
        ArrayType::Decimal
    }

    fn column_type() -> ColumnType {
        ColumnType::Decimal(Some((10, MONEY_SCALE)))
    }
}

impl Nullable for Money {
    fn null() -> Value {
        <Decimal as Nullable>::null()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_float_scale_is_restored() {
        // what a REAL column yields for 200.00 and 0.10
        assert_eq!(Money::from(Decimal::new(200, 0)).to_string(), "200.00");
        assert_eq!(Money::from(Decimal::new(1, 1)).to_string(), "0.10");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_float_noise_is_rounded_away() {
        let noisy = Decimal::from_str_exact("12.550000000000001").unwrap();
        assert_eq!(Money::from(noisy).to_string(), "12.55");
    }

    #[test]
    fn test_serializes_as_two_digit_string() {
        let json = serde_json::to_value(Money::from(Decimal::new(3, 0))).unwrap();
        assert_eq!(json, serde_json::json!("3.00"));

        let parsed: Money = serde_json::from_value(serde_json::json!("80.5")).unwrap();
        assert_eq!(parsed.to_string(), "80.50");
    }
}
