//! Product catalog model.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use larek_core::{Product, ProductId};
use tracing::debug;

use super::ModelError;
use crate::events::{Event, EventBus};

/// Owns the catalog and the product currently selected for preview.
///
/// The selection is always a product present in the list, or `None`.
pub struct CatalogModel {
    bus: Rc<EventBus>,
    products: RefCell<Vec<Product>>,
    selected: RefCell<Option<Product>>,
}

impl CatalogModel {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            products: RefCell::new(Vec::new()),
            selected: RefCell::new(None),
        }
    }

    /// Replace the product list and emit `products:changed`.
    ///
    /// A selection that is not in the new list is dropped.
    pub fn set_products(&self, products: Vec<Product>) {
        {
            let mut selected = self.selected.borrow_mut();
            if selected
                .as_ref()
                .is_some_and(|s| !products.iter().any(|p| p.id == s.id))
            {
                debug!("dropping selection no longer in catalog");
                *selected = None;
            }
        }
        *self.products.borrow_mut() = products;
        self.bus.emit(Event::ProductsChanged);
    }

    /// The current products, in catalog order.
    ///
    /// Drop the returned guard before calling a mutator.
    #[must_use]
    pub fn products(&self) -> Ref<'_, [Product]> {
        Ref::map(self.products.borrow(), Vec::as_slice)
    }

    /// First product with the given id.
    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.products.borrow().iter().find(|p| &p.id == id).cloned()
    }

    /// Select `product` for preview and emit `product:selected`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownProduct` if the product is not in the
    /// catalog; nothing is emitted in that case.
    pub fn set_selected_product(&self, product: Product) -> Result<(), ModelError> {
        if !self.products.borrow().iter().any(|p| p.id == product.id) {
            return Err(ModelError::UnknownProduct(product.id));
        }
        *self.selected.borrow_mut() = Some(product.clone());
        self.bus.emit(Event::ProductSelected { product });
        Ok(())
    }

    /// The product selected for preview, if any.
    #[must_use]
    pub fn selected_product(&self) -> Option<Product> {
        self.selected.borrow().clone()
    }
}
