//! web-larek storefront engine.
//!
//! An event-driven shop: models announce every change on a synchronous
//! [`EventBus`](events::EventBus), the [`Checkout`](checkout::Checkout)
//! orchestrator turns user intents into model mutations and screen snapshots,
//! and [`ShopApi`](api::ShopApi) talks to the web-larek order API.
//!
//! The engine is single-threaded. Order submission uses
//! `tokio::task::spawn_local`, so it must run inside a `LocalSet`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod state;
pub mod terminal;
