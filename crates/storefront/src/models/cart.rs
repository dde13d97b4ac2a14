//! Shopping cart model.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use larek_core::{Price, Product, ProductId};

use crate::events::{Event, EventBus};

/// Ordered cart lines.
///
/// The same product may appear on several lines; each line counts and is
/// priced separately. Every mutator emits `cart:changed`, even when it had
/// nothing to do.
pub struct CartModel {
    bus: Rc<EventBus>,
    items: RefCell<Vec<Product>>,
}

impl CartModel {
    /// Create an empty cart.
    #[must_use]
    pub const fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            items: RefCell::new(Vec::new()),
        }
    }

    /// Append a line.
    pub fn add_item(&self, product: Product) {
        self.items.borrow_mut().push(product);
        self.bus.emit(Event::CartChanged);
    }

    /// Remove every line for `id`.
    pub fn remove_item(&self, id: &ProductId) {
        self.items.borrow_mut().retain(|item| &item.id != id);
        self.bus.emit(Event::CartChanged);
    }

    /// Remove one line per entry of `ids`, first match first, and emit once.
    ///
    /// Ids with no matching line are skipped.
    pub fn remove_lines(&self, ids: &[ProductId]) {
        {
            let mut items = self.items.borrow_mut();
            for id in ids {
                if let Some(pos) = items.iter().position(|item| &item.id == id) {
                    items.remove(pos);
                }
            }
        }
        self.bus.emit(Event::CartChanged);
    }

    /// Remove all lines.
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
        self.bus.emit(Event::CartChanged);
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> Ref<'_, [Product]> {
        Ref::map(self.items.borrow(), Vec::as_slice)
    }

    /// Number of lines.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.borrow().len()
    }

    /// Sum of line prices; unpriced lines count as zero.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.borrow().iter().map(Product::price_or_zero).sum()
    }

    /// Whether any line holds `id`.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.borrow().iter().any(|item| &item.id == id)
    }

    /// Product ids of every line, duplicates included.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ProductId> {
        self.items.borrow().iter().map(|item| item.id.clone()).collect()
    }
}
