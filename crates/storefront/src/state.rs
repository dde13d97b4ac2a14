//! The assembled storefront engine.

use std::rc::Rc;

use crate::checkout::{Checkout, OrderGateway};
use crate::events::{Event, EventBus};
use crate::models::{BuyerModel, CartModel, CatalogModel};

/// Bus, models and checkout wired together.
///
/// Cheaply cloneable via `Rc`; every clone shares the same bus and models.
pub struct Storefront<G> {
    bus: Rc<EventBus>,
    catalog: Rc<CatalogModel>,
    cart: Rc<CartModel>,
    buyer: Rc<BuyerModel>,
    checkout: Rc<Checkout<G>>,
}

impl<G: OrderGateway + 'static> Storefront<G> {
    /// Build the models on a fresh bus and install the checkout.
    pub fn new(gateway: G) -> Self {
        let bus = Rc::new(EventBus::new());
        let catalog = Rc::new(CatalogModel::new(Rc::clone(&bus)));
        let cart = Rc::new(CartModel::new(Rc::clone(&bus)));
        let buyer = Rc::new(BuyerModel::new(Rc::clone(&bus)));
        let checkout = Checkout::install(
            Rc::clone(&bus),
            Rc::clone(&catalog),
            Rc::clone(&cart),
            Rc::clone(&buyer),
            gateway,
        );

        Self {
            bus,
            catalog,
            cart,
            buyer,
            checkout,
        }
    }

    /// Publish a user intent.
    pub fn emit(&self, event: Event) {
        self.bus.emit(event);
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogModel {
        &self.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartModel {
        &self.cart
    }

    #[must_use]
    pub fn buyer(&self) -> &BuyerModel {
        &self.buyer
    }

    #[must_use]
    pub fn checkout(&self) -> &Checkout<G> {
        &self.checkout
    }
}

impl<G> Clone for Storefront<G> {
    fn clone(&self) -> Self {
        Self {
            bus: Rc::clone(&self.bus),
            catalog: Rc::clone(&self.catalog),
            cart: Rc::clone(&self.cart),
            buyer: Rc::clone(&self.buyer),
            checkout: Rc::clone(&self.checkout),
        }
    }
}
