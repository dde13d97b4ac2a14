//! Payment method chosen on the first checkout step.

use serde::{Deserialize, Serialize};

/// How the buyer pays for an order.
///
/// Serialized in lowercase, matching the order API (`"card"`, `"cash"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online payment by card.
    Card,
    /// Cash on delivery.
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
