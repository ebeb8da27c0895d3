//! Monetary amounts stored as whole cents.
//!
//! Amounts travel over the wire as decimal numbers (e.g. `12.34`) but are kept
//! as integer cents everywhere else so that sums are exact.
//!
//! A single amount fits in an `i64` column, while totals are held in an
//! `i128` and cannot overflow for any number of stored transactions.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The largest decimal magnitude accepted by [Amount::from_decimal].
///
/// Every cent up to this magnitude is exactly representable as an `f64`.
pub const MAX_DECIMAL: f64 = 1e12;

/// An amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i128);

impl Amount {
    /// No money at all.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents as i128)
    }

    /// Create an amount from a decimal number, rounding half away from zero to
    /// the nearest cent.
    ///
    /// Returns `None` if `value` is NaN, infinite or larger than [MAX_DECIMAL].
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() > MAX_DECIMAL {
            return None;
        }

        Some(Self::from_cents((value * 100.0).round() as i64))
    }

    /// The amount as a decimal number of dollars, e.g. `12.34`.
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// The share of `total` that this amount makes up as a percentage,
    /// rounded half-up to two decimal places.
    ///
    /// Returns `0.0` when `total` is zero so callers never see NaN or infinity.
    pub fn percentage_of(self, total: Amount) -> f64 {
        if total.0 == 0 {
            return 0.0;
        }

        // Work in hundredths of a percent so the rounding is exact.
        let numerator = self.0.abs() * 10_000;
        let denominator = total.0.abs();
        let hundredths = (2 * numerator + denominator) / (2 * denominator);
        let sign = if (self.0 < 0) != (total.0 < 0) { -1 } else { 1 };

        (sign * hundredths) as f64 / 100.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;

        Amount::from_decimal(value)
            .ok_or_else(|| serde::de::Error::custom("amount must be a finite number"))
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let cents = i64::try_from(self.0)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;

        Ok(ToSqlOutput::from(cents))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(Amount::from_cents)
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::{Connection, params};

    use super::{Amount, MAX_DECIMAL};

    #[test]
    fn from_decimal_rounds_to_nearest_cent() {
        assert_eq!(Amount::from_decimal(12.346), Some(Amount::from_cents(1235)));
        assert_eq!(Amount::from_decimal(0.1), Some(Amount::from_cents(10)));
        assert_eq!(Amount::from_decimal(150.0), Some(Amount::from_cents(15000)));
    }

    #[test]
    fn from_decimal_rejects_non_finite_values() {
        assert_eq!(Amount::from_decimal(f64::NAN), None);
        assert_eq!(Amount::from_decimal(f64::INFINITY), None);
        assert_eq!(Amount::from_decimal(1e300), None);
    }

    #[test]
    fn from_decimal_rejects_values_above_limit() {
        assert_eq!(
            Amount::from_decimal(MAX_DECIMAL),
            Some(Amount::from_cents(100_000_000_000_000))
        );
        assert_eq!(Amount::from_decimal(MAX_DECIMAL + 1.0), None);
        assert_eq!(Amount::from_decimal(1e15), None);
        assert_eq!(Amount::from_decimal(-1e15), None);
    }

    #[test]
    fn largest_amounts_keep_every_cent() {
        for cents in [99_999_999_999_999, 99_999_999_999_901, 12_345_678_901_234] {
            let amount = Amount::from_cents(cents);

            assert_eq!(Amount::from_decimal(amount.as_decimal()), Some(amount));

            let json = serde_json::to_string(&amount).unwrap();
            assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), amount);
        }
    }

    #[test]
    fn sum_of_many_largest_amounts_does_not_overflow() {
        let largest = Amount::from_decimal(MAX_DECIMAL).unwrap();
        let count = 1_000_000;

        let total: Amount = std::iter::repeat_n(largest, count).sum();

        assert!(total > Amount::from_cents(i64::MAX));
        assert_eq!(total.to_string(), "1000000000000000000.00");
        assert_eq!(largest.percentage_of(total), 0.0);
        assert_eq!(total - total, Amount::ZERO);
    }

    #[test]
    fn stores_as_integer_cents() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE amount (cents INTEGER NOT NULL)", ())
            .unwrap();
        let amount = Amount::from_cents(99_999_999_999_999);

        connection
            .execute("INSERT INTO amount (cents) VALUES (?1)", params![amount])
            .unwrap();
        let (stored, cents): (Amount, i64) = connection
            .query_row("SELECT cents, cents FROM amount", (), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();

        assert_eq!(stored, amount);
        assert_eq!(cents, 99_999_999_999_999);
    }

    #[test]
    fn totals_too_large_for_a_column_are_not_stored() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE amount (cents INTEGER NOT NULL)", ())
            .unwrap();
        let total = Amount::from_cents(i64::MAX) + Amount::from_cents(1);

        let result = connection.execute("INSERT INTO amount (cents) VALUES (?1)", params![total]);

        assert!(result.is_err());
    }

    #[test]
    fn sums_are_exact() {
        // 0.1 + 0.2 != 0.3 in floating point.
        let total: Amount = [0.1, 0.2]
            .into_iter()
            .map(|value| Amount::from_decimal(value).unwrap())
            .sum();

        assert_eq!(total, Amount::from_decimal(0.3).unwrap());
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1/8 = 12.5% exactly, 1/3 = 33.333...%, 2/3 = 66.666...%
        assert_eq!(Amount::from_cents(1).percentage_of(Amount::from_cents(8)), 12.5);
        assert_eq!(Amount::from_cents(1).percentage_of(Amount::from_cents(3)), 33.33);
        assert_eq!(Amount::from_cents(2).percentage_of(Amount::from_cents(3)), 66.67);
        // 1/40000 = 0.0025% rounds down, 1/20000 = 0.005% rounds half up to 0.01
        assert_eq!(Amount::from_cents(1).percentage_of(Amount::from_cents(40_000)), 0.0);
        assert_eq!(Amount::from_cents(1).percentage_of(Amount::from_cents(20_000)), 0.01);
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        let percentage = Amount::from_cents(500).percentage_of(Amount::ZERO);

        assert_eq!(percentage, 0.0);
        assert!(percentage.is_finite());
    }

    #[test]
    fn display_formats_two_decimal_places() {
        assert_eq!(Amount::from_cents(1234).to_string(), "12.34");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(-250).to_string(), "-2.50");
    }

    #[test]
    fn serializes_as_decimal_number() {
        let json = serde_json::to_string(&Amount::from_cents(1234)).unwrap();

        assert_eq!(json, "12.34");
        assert_eq!(
            serde_json::from_str::<Amount>(&json).unwrap(),
            Amount::from_cents(1234)
        );
    }
}
