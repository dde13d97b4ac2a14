//! Checkout steps and the transitions between them.

/// Where the shopper currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckoutStep {
    /// Gallery only, no modal open.
    #[default]
    Browsing,
    /// Product preview modal.
    Preview,
    /// Cart modal.
    Cart,
    /// First checkout form: payment and address.
    Order,
    /// Second checkout form: email and phone.
    Contacts,
    /// Order accepted.
    Success,
}

/// Something that moves the shopper between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// A product was selected from the gallery.
    SelectProduct,
    /// The previewed product was added to or removed from the cart.
    PreviewDone,
    /// The cart icon was clicked.
    OpenCart,
    /// "Place order" was pressed in the cart.
    ProceedToOrder,
    /// The order step passed validation.
    OrderAccepted,
    /// The order API accepted the order.
    OrderPlaced,
    /// The modal or the success screen was closed.
    Close,
}

impl CheckoutStep {
    /// The step reached by applying `transition`, or `None` if it does not
    /// apply here.
    #[must_use]
    pub const fn next(self, transition: Transition) -> Option<Self> {
        use CheckoutStep as S;
        use Transition as T;

        match (self, transition) {
            (S::Browsing | S::Preview, T::SelectProduct) => Some(S::Preview),
            (S::Preview, T::PreviewDone) | (_, T::Close) => Some(S::Browsing),
            (S::Browsing | S::Preview | S::Cart, T::OpenCart) => Some(S::Cart),
            (S::Cart, T::ProceedToOrder) => Some(S::Order),
            (S::Order, T::OrderAccepted) => Some(S::Contacts),
            (S::Contacts, T::OrderPlaced) => Some(S::Success),
            _ => None,
        }
    }

    /// Whether a modal is shown.
    #[must_use]
    pub const fn is_modal(self) -> bool {
        !matches!(self, Self::Browsing)
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Browsing => write!(f, "browsing"),
            Self::Preview => write!(f, "preview"),
            Self::Cart => write!(f, "cart"),
            Self::Order => write!(f, "order"),
            Self::Contacts => write!(f, "contacts"),
            Self::Success => write!(f, "success"),
        }
    }
}
