//! Presentation snapshots.
//!
//! The orchestrator keeps these up to date; a [`View`] turns them into
//! something displayable. Snapshots are plain data and never reach back into
//! the models.

use larek_core::{PaymentMethod, Price, Product, ProductId};

/// Render contract for the presentation layer.
pub trait View {
    /// Data the view renders.
    type Snapshot: ?Sized;
    /// What rendering produces.
    type Output;

    /// Render a snapshot.
    fn render(&self, snapshot: &Self::Snapshot) -> Self::Output;
}

/// Header with the cart badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderScreen {
    pub counter: usize,
}

/// A gallery card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardScreen {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub image: String,
    pub price: Option<Price>,
}

impl From<&Product> for CardScreen {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: product.price,
        }
    }
}

/// The product preview modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewScreen {
    pub product: Product,
    /// Shows "remove" instead of "add".
    pub in_cart: bool,
    /// False for products without a price; the add button is disabled.
    pub can_buy: bool,
}

/// One line in the cart modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineScreen {
    /// 1-based position.
    pub index: usize,
    pub id: ProductId,
    pub title: String,
    pub price: Option<Price>,
}

/// The cart modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartScreen {
    pub lines: Vec<CartLineScreen>,
    pub total: Price,
    /// The order button is disabled for an empty cart.
    pub can_order: bool,
}

impl CartScreen {
    pub(crate) fn from_items(items: &[Product], total: Price) -> Self {
        let lines = items
            .iter()
            .enumerate()
            .map(|(i, product)| CartLineScreen {
                index: i + 1,
                id: product.id.clone(),
                title: product.title.clone(),
                price: product.price,
            })
            .collect::<Vec<_>>();
        let can_order = !lines.is_empty();
        Self {
            lines,
            total,
            can_order,
        }
    }
}

/// Submit button state and the form's single error slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub valid: bool,
    pub error: String,
}

/// First checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFormScreen {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub form: FormState,
}

/// Second checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactsFormScreen {
    pub email: String,
    pub phone: String,
    pub form: FormState,
}

/// Order confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessScreen {
    /// Total charged, as reported by the order API.
    pub total: Price,
}

/// Modal content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Preview(PreviewScreen),
    Cart(CartScreen),
    Order(OrderFormScreen),
    Contacts(ContactsFormScreen),
    Success(SuccessScreen),
}

/// Everything on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screens {
    pub header: HeaderScreen,
    pub gallery: Vec<CardScreen>,
    /// `None` when no modal is open.
    pub modal: Option<Modal>,
}
