//! Larek Core - Shared data types.
//!
//! This crate provides the types exchanged between the storefront engine and
//! the web-larek order API:
//! - products and their prices
//! - the buyer's checkout draft
//! - orders and order results
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no event bus, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, payment methods, products, buyer drafts, orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
