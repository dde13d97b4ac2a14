//! Domain models for the storefront.
//!
//! Each model owns one piece of state and announces every mutation on the
//! [`EventBus`](crate::events::EventBus) after the mutation is complete, so a
//! handler always reads the new state.
//!
//! - [`CatalogModel`] - product list and the product being previewed
//! - [`CartModel`] - ordered cart lines, count and total
//! - [`BuyerModel`] - checkout draft and the step validators

mod buyer;
mod cart;
mod catalog;

pub use buyer::{BuyerModel, ValidationResult, messages};
pub use cart::CartModel;
pub use catalog::CatalogModel;

use larek_core::ProductId;
use thiserror::Error;

/// Errors raised by model mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The product is not part of the current catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}
