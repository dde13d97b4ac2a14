//! Core types for the Larek storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod buyer;
pub mod id;
pub mod order;
pub mod payment;
pub mod price;
pub mod product;

pub use buyer::{BuyerDraft, BuyerField};
pub use id::*;
pub use order::{Order, OrderResult};
pub use payment::PaymentMethod;
pub use price::{PRICELESS_LABEL, Price};
pub use product::{Product, ProductList};
