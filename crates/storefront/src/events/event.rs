//! The bus protocol: every event the storefront exchanges, with its payload.

use larek_core::{OrderResult, PaymentMethod, Product, ProductId};

/// A bus event and its payload.
///
/// Handlers receive events by reference; payloads are never cloned by the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The catalog's product list was replaced.
    ProductsChanged,
    /// The catalog's selected product changed.
    ProductSelected { product: Product },
    /// A gallery card was clicked.
    CardSelect { product: Product },
    /// "Add to cart" was pressed in the preview.
    PreviewAdd { product: Product },
    /// "Remove from cart" was pressed in the preview.
    PreviewRemove { product_id: ProductId },
    /// The cart's lines changed.
    CartChanged,
    /// The header cart icon was clicked.
    CartOpen,
    /// A line's delete button was pressed in the cart view.
    CartRemove { product_id: ProductId },
    /// "Place order" was pressed in the cart view.
    CartOrder,
    /// The buyer draft changed.
    BuyerChanged,
    /// A payment button was pressed on the order step.
    PaymentChange { payment: PaymentMethod },
    /// The address input changed on the order step.
    AddressChange { address: String },
    /// The order step form was submitted.
    OrderSubmit,
    /// The email input changed on the contacts step.
    EmailChange { email: String },
    /// The phone input changed on the contacts step.
    PhoneChange { phone: String },
    /// The contacts step form was submitted.
    ContactsSubmit,
    /// The order API accepted the order sent during checkout `generation`.
    OrderPlaced { result: OrderResult, generation: u64 },
    /// The order API call sent during checkout `generation` failed.
    OrderFailed { message: String, generation: u64 },
    /// The success screen was dismissed.
    SuccessClose,
    /// The modal was closed.
    ModalClose,
}

/// Names of bus events; handlers subscribe by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ProductsChanged,
    ProductSelected,
    CardSelect,
    PreviewAdd,
    PreviewRemove,
    CartChanged,
    CartOpen,
    CartRemove,
    CartOrder,
    BuyerChanged,
    PaymentChange,
    AddressChange,
    OrderSubmit,
    EmailChange,
    PhoneChange,
    ContactsSubmit,
    OrderPlaced,
    OrderFailed,
    SuccessClose,
    ModalClose,
}

impl EventKind {
    /// The event's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductsChanged => "products:changed",
            Self::ProductSelected => "product:selected",
            Self::CardSelect => "card:select",
            Self::PreviewAdd => "preview:add",
            Self::PreviewRemove => "preview:remove",
            Self::CartChanged => "cart:changed",
            Self::CartOpen => "cart:open",
            Self::CartRemove => "cart:remove",
            Self::CartOrder => "cart:order",
            Self::BuyerChanged => "buyer:changed",
            Self::PaymentChange => "order:payment",
            Self::AddressChange => "order:address",
            Self::OrderSubmit => "order:submit",
            Self::EmailChange => "contacts:email",
            Self::PhoneChange => "contacts:phone",
            Self::ContactsSubmit => "contacts:submit",
            Self::OrderPlaced => "order:placed",
            Self::OrderFailed => "order:failed",
            Self::SuccessClose => "success:close",
            Self::ModalClose => "modal:close",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    /// The kind handlers subscribe to for this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ProductsChanged => EventKind::ProductsChanged,
            Self::ProductSelected { .. } => EventKind::ProductSelected,
            Self::CardSelect { .. } => EventKind::CardSelect,
            Self::PreviewAdd { .. } => EventKind::PreviewAdd,
            Self::PreviewRemove { .. } => EventKind::PreviewRemove,
            Self::CartChanged => EventKind::CartChanged,
            Self::CartOpen => EventKind::CartOpen,
            Self::CartRemove { .. } => EventKind::CartRemove,
            Self::CartOrder => EventKind::CartOrder,
            Self::BuyerChanged => EventKind::BuyerChanged,
            Self::PaymentChange { .. } => EventKind::PaymentChange,
            Self::AddressChange { .. } => EventKind::AddressChange,
            Self::OrderSubmit => EventKind::OrderSubmit,
            Self::EmailChange { .. } => EventKind::EmailChange,
            Self::PhoneChange { .. } => EventKind::PhoneChange,
            Self::ContactsSubmit => EventKind::ContactsSubmit,
            Self::OrderPlaced { .. } => EventKind::OrderPlaced,
            Self::OrderFailed { .. } => EventKind::OrderFailed,
            Self::SuccessClose => EventKind::SuccessClose,
            Self::ModalClose => EventKind::ModalClose,
        }
    }

    /// The event's wire name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}
