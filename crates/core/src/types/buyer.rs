//! The buyer's in-progress checkout data.

use serde::{Deserialize, Serialize};

use super::PaymentMethod;

/// Fields collected from the buyer across the two checkout steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerField {
    Payment,
    Email,
    Phone,
    Address,
}

impl BuyerField {
    /// All fields, in the order they are collected.
    pub const ALL: [Self; 4] = [Self::Payment, Self::Address, Self::Email, Self::Phone];
}

impl std::fmt::Display for BuyerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => write!(f, "payment"),
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
            Self::Address => write!(f, "address"),
        }
    }
}

/// Partially filled checkout data.
///
/// Also used as the "partial" argument of a merge: every `Some` field
/// overwrites the draft, every `None` field leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl BuyerDraft {
    /// A partial carrying only the payment method.
    #[must_use]
    pub fn with_payment(payment: PaymentMethod) -> Self {
        Self {
            payment: Some(payment),
            ..Self::default()
        }
    }

    /// A partial carrying only the email.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// A partial carrying only the phone.
    #[must_use]
    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    /// A partial carrying only the address.
    #[must_use]
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Shallow-merge `partial` into this draft, last write wins per field.
    pub fn merge(&mut self, partial: Self) {
        if partial.payment.is_some() {
            self.payment = partial.payment;
        }
        if partial.email.is_some() {
            self.email = partial.email;
        }
        if partial.phone.is_some() {
            self.phone = partial.phone;
        }
        if partial.address.is_some() {
            self.address = partial.address;
        }
    }

    /// Whether no field has been set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.payment.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }

    /// Whether `field` holds a usable value: set, and for text fields,
    /// non-empty after trimming whitespace.
    #[must_use]
    pub fn is_present(&self, field: BuyerField) -> bool {
        fn filled(value: Option<&String>) -> bool {
            value.is_some_and(|v| !v.trim().is_empty())
        }

        match field {
            BuyerField::Payment => self.payment.is_some(),
            BuyerField::Email => filled(self.email.as_ref()),
            BuyerField::Phone => filled(self.phone.as_ref()),
            BuyerField::Address => filled(self.address.as_ref()),
        }
    }
}
