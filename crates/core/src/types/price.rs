//! Type-safe price representation using decimal arithmetic.
//!
//! The web-larek catalog prices everything in "synapses", a single in-game
//! currency, so a price is just an amount. Products that are not for sale
//! carry no price at all (`Option<Price>::None`), which the API encodes as
//! JSON `null`.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display suffix for amounts.
const CURRENCY_UNIT: &str = "synapses";

/// Label shown in place of a missing price.
pub const PRICELESS_LABEL: &str = "Priceless";

/// An amount of synapses.
///
/// Serialized as a plain JSON number to match the order API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero synapses.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of synapses.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format an optional price, using [`PRICELESS_LABEL`] for `None`.
    #[must_use]
    pub fn display_optional(price: Option<Self>) -> String {
        price.map_or_else(|| PRICELESS_LABEL.to_string(), |p| p.to_string())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CURRENCY_UNIT}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
