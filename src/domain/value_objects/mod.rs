//! Value Objects for the storefront

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Prefix that moves an external feed id into the catalog id namespace.
pub const EXTERNAL_PREFIX: &str = "external:";

/// Money value object, held in minor units (cents).
///
/// Unit prices travel as decimal dollars on the wire (`9.99`), the shape both
/// the external feed and the cart client use. Deserialization is the
/// conversion boundary: the amount is rounded to whole cents once and never
/// touched as a float again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self { Self(cents) }
    pub const fn cents(&self) -> i64 { self.0 }
    pub fn to_dollars(self) -> Decimal { Decimal::new(self.0, 2) }

    /// Converts a decimal-dollar amount into cents, rounding half away from zero.
    pub fn from_dollars(dollars: f64) -> Result<Self, MoneyError> {
        if !dollars.is_finite() { return Err(MoneyError::NotFinite); }
        if dollars < 0.0 { return Err(MoneyError::Negative); }
        // f64's Display is the shortest round-trip form, so 109.95 parses as exactly 109.95.
        let exact = Decimal::from_str(&dollars.to_string()).map_err(|_| MoneyError::OutOfRange)?;
        exact
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or(MoneyError::OutOfRange)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "${}", self.to_dollars()) }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Money::from_dollars(dollars).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("price must not be negative")]
    Negative,
    #[error("price must be a finite number")]
    NotFinite,
    #[error("price is out of range")]
    OutOfRange,
}

/// Review score attached to a product.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Rating {
    #[validate(range(min = 0.0, max = 5.0, message = "rating.rate must be between 0 and 5"))]
    pub rate: f64,
    pub count: u64,
}

/// A parsed catalog id: either an external feed id or a local store key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProductRef {
    External(u64),
    Local(String),
}

impl ProductRef {
    /// Splits an id into its source namespace.
    ///
    /// Anything without the external prefix is a local key and is passed
    /// through untouched. A prefixed id must carry a plain unsigned integer.
    pub fn parse(id: &str) -> Result<Self, InvalidProductId> {
        let Some(suffix) = id.strip_prefix(EXTERNAL_PREFIX) else {
            return Ok(Self::Local(id.to_string()));
        };
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidProductId(id.to_string()));
        }
        suffix.parse().map(Self::External).map_err(|_| InvalidProductId(id.to_string()))
    }

    pub fn external_id(external_id: u64) -> String { format!("{EXTERNAL_PREFIX}{external_id}") }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(id) => write!(f, "{EXTERNAL_PREFIX}{id}"),
            Self::Local(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid product id: {0}")]
pub struct InvalidProductId(pub String);
