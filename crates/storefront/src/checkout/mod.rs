//! Checkout orchestrator.
//!
//! [`Checkout`] subscribes to the bus and drives the shopper through
//! `Browsing -> Preview -> Cart -> Order -> Contacts -> Success`. It mutates
//! the models in response to user intents, re-validates the active form after
//! every field change, keeps the presentation [`Screens`] current, and hands
//! the finished order to an [`OrderGateway`].
//!
//! Intents that do not fit the current [`CheckoutStep`] are ignored.
//!
//! # Runtime
//!
//! Order submission is spawned with `tokio::task::spawn_local`, so the
//! orchestrator must be driven from inside a `tokio::task::LocalSet`.

mod screens;
mod state;

pub use screens::{
    CardScreen, CartLineScreen, CartScreen, ContactsFormScreen, FormState, HeaderScreen, Modal,
    OrderFormScreen, PreviewScreen, Screens, SuccessScreen, View,
};
pub use state::{CheckoutStep, Transition};

use std::cell::{Cell, Ref, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use larek_core::{BuyerDraft, BuyerField, Order, OrderResult, PaymentMethod, Product, ProductId};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::ApiError;
use crate::events::{Event, EventBus, EventKind};
use crate::models::{BuyerModel, CartModel, CatalogModel, ValidationResult};

/// Shown in the contacts form when the order API call fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to place the order, please try again";

/// Shown in the contacts form while an order request is in flight.
pub const SUBMITTING_MESSAGE: &str = "Placing the order, please wait";

/// Address is reported before payment when both are missing.
const ORDER_ERROR_PRIORITY: [BuyerField; 2] = [BuyerField::Address, BuyerField::Payment];
const CONTACTS_ERROR_PRIORITY: [BuyerField; 2] = [BuyerField::Email, BuyerField::Phone];
const FULL_ERROR_PRIORITY: [BuyerField; 4] = [
    BuyerField::Address,
    BuyerField::Payment,
    BuyerField::Email,
    BuyerField::Phone,
];

const HANDLED_EVENTS: [EventKind; 19] = [
    EventKind::ProductsChanged,
    EventKind::CardSelect,
    EventKind::ProductSelected,
    EventKind::PreviewAdd,
    EventKind::PreviewRemove,
    EventKind::CartChanged,
    EventKind::CartOpen,
    EventKind::CartRemove,
    EventKind::CartOrder,
    EventKind::PaymentChange,
    EventKind::AddressChange,
    EventKind::OrderSubmit,
    EventKind::EmailChange,
    EventKind::PhoneChange,
    EventKind::ContactsSubmit,
    EventKind::OrderPlaced,
    EventKind::OrderFailed,
    EventKind::SuccessClose,
    EventKind::ModalClose,
];

/// Places orders with the backend.
pub trait OrderGateway {
    /// Submit `order` and return the backend's confirmation.
    fn create_order(&self, order: &Order) -> impl Future<Output = Result<OrderResult, ApiError>>;
}

/// An order request awaiting its reply.
struct InFlight {
    generation: u64,
    items: Vec<ProductId>,
}

/// The checkout state machine, wired to the bus.
///
/// Every `cart:order` that starts a checkout bumps the generation. Order
/// replies carry the generation they were sent from; a reply from an earlier
/// checkout only removes the lines it paid for and leaves the current step,
/// form and buyer draft alone.
pub struct Checkout<G> {
    bus: Rc<EventBus>,
    catalog: Rc<CatalogModel>,
    cart: Rc<CartModel>,
    buyer: Rc<BuyerModel>,
    gateway: Rc<G>,
    step: Cell<CheckoutStep>,
    screens: RefCell<Screens>,
    generation: Cell<u64>,
    in_flight: RefCell<Option<InFlight>>,
    submission: RefCell<Option<JoinHandle<()>>>,
}

impl<G: OrderGateway + 'static> Checkout<G> {
    /// Create the orchestrator and subscribe it to `bus`.
    ///
    /// The bus only holds weak references; keep the returned `Rc` alive for
    /// as long as the checkout should react to events.
    pub fn install(
        bus: Rc<EventBus>,
        catalog: Rc<CatalogModel>,
        cart: Rc<CartModel>,
        buyer: Rc<BuyerModel>,
        gateway: G,
    ) -> Rc<Self> {
        let checkout = Rc::new(Self {
            bus,
            catalog,
            cart,
            buyer,
            gateway: Rc::new(gateway),
            step: Cell::new(CheckoutStep::default()),
            screens: RefCell::new(Screens::default()),
            generation: Cell::new(0),
            in_flight: RefCell::new(None),
            submission: RefCell::new(None),
        });

        for kind in HANDLED_EVENTS {
            let weak: Weak<Self> = Rc::downgrade(&checkout);
            checkout.bus.on(kind, move |event| {
                if let Some(checkout) = weak.upgrade() {
                    checkout.handle(event);
                }
            });
        }

        checkout.refresh_gallery();
        checkout.refresh_header();
        checkout
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> CheckoutStep {
        self.step.get()
    }

    /// Current presentation state.
    ///
    /// Drop the returned guard before emitting.
    #[must_use]
    pub fn screens(&self) -> Ref<'_, Screens> {
        self.screens.borrow()
    }

    /// Whether an order request is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.borrow().is_some()
    }

    /// Number of checkouts started so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Wait until the in-flight order request, if any, has been handled.
    pub async fn wait_for_submission(&self) {
        let handle = self.submission.borrow_mut().take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            error!(error = %e, "order submission task failed");
        }
    }

    fn handle(&self, event: &Event) {
        match event {
            Event::ProductsChanged => self.on_products_changed(),
            Event::CardSelect { product } => self.select_product(product),
            Event::ProductSelected { product } => self.open_preview(product),
            Event::PreviewAdd { product } => self.add_from_preview(product),
            Event::PreviewRemove { product_id } => self.remove_from_preview(product_id),
            Event::CartChanged => self.on_cart_changed(),
            Event::CartOpen => self.open_cart(),
            Event::CartRemove { product_id } => self.remove_from_cart(product_id),
            Event::CartOrder => self.start_order(),
            Event::PaymentChange { payment } => self.change_payment(*payment),
            Event::AddressChange { address } => self.change_address(address),
            Event::OrderSubmit => self.submit_order_step(),
            Event::EmailChange { email } => self.change_email(email),
            Event::PhoneChange { phone } => self.change_phone(phone),
            Event::ContactsSubmit => self.submit_contacts_step(),
            Event::OrderPlaced { result, generation } => self.finish_order(result, *generation),
            Event::OrderFailed {
                message,
                generation,
            } => self.fail_order(message, *generation),
            Event::SuccessClose | Event::ModalClose => self.close(),
            Event::BuyerChanged => {}
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn can(&self, transition: Transition) -> bool {
        let allowed = self.step.get().next(transition).is_some();
        if !allowed {
            debug!(step = %self.step.get(), ?transition, "transition ignored");
        }
        allowed
    }

    fn advance(&self, transition: Transition, modal: Option<Modal>) -> bool {
        let from = self.step.get();
        let Some(to) = from.next(transition) else {
            debug!(step = %from, ?transition, "transition ignored");
            return false;
        };
        if from != to {
            info!(from = %from, to = %to, "checkout step");
        }
        self.step.set(to);
        self.screens.borrow_mut().modal = modal;
        true
    }

    fn in_step(&self, step: CheckoutStep, what: &str) -> bool {
        let current = self.step.get();
        if current != step {
            debug!(step = %current, what, "intent ignored");
        }
        current == step
    }

    // -------------------------------------------------------------------------
    // Catalog and preview
    // -------------------------------------------------------------------------

    fn refresh_gallery(&self) {
        let gallery = self.catalog.products().iter().map(CardScreen::from).collect();
        self.screens.borrow_mut().gallery = gallery;
    }

    fn on_products_changed(&self) {
        self.refresh_gallery();

        let stale = match self.screens.borrow().modal.as_ref() {
            Some(Modal::Preview(preview)) => self
                .catalog
                .product_by_id(&preview.product.id)
                .is_none()
                .then(|| preview.product.id.clone()),
            _ => None,
        };
        if let Some(product_id) = stale {
            info!(%product_id, "previewed product left the catalog, closing preview");
            self.advance(Transition::Close, None);
        }
    }

    fn select_product(&self, product: &Product) {
        if !self.can(Transition::SelectProduct) {
            return;
        }
        if let Err(e) = self.catalog.set_selected_product(product.clone()) {
            warn!(error = %e, "cannot select product");
        }
    }

    fn open_preview(&self, product: &Product) {
        let preview = PreviewScreen {
            product: product.clone(),
            in_cart: self.cart.contains(&product.id),
            can_buy: product.is_for_sale(),
        };
        self.advance(Transition::SelectProduct, Some(Modal::Preview(preview)));
    }

    fn add_from_preview(&self, product: &Product) {
        if !self.can(Transition::PreviewDone) {
            return;
        }
        if !product.is_for_sale() {
            warn!(product_id = %product.id, "product is not for sale");
            return;
        }
        if self.catalog.product_by_id(&product.id).is_none() {
            warn!(product_id = %product.id, "product is no longer in the catalog");
            return;
        }
        self.cart.add_item(product.clone());
        self.advance(Transition::PreviewDone, None);
    }

    fn remove_from_preview(&self, product_id: &ProductId) {
        if !self.can(Transition::PreviewDone) {
            return;
        }
        self.cart.remove_item(product_id);
        self.advance(Transition::PreviewDone, None);
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    fn cart_screen(&self) -> CartScreen {
        CartScreen::from_items(&self.cart.items(), self.cart.total())
    }

    fn refresh_header(&self) {
        let counter = self.cart.count();
        self.screens.borrow_mut().header.counter = counter;
    }

    fn on_cart_changed(&self) {
        self.refresh_header();
        if self.step.get() == CheckoutStep::Cart {
            let cart = self.cart_screen();
            self.screens.borrow_mut().modal = Some(Modal::Cart(cart));
        }
    }

    fn open_cart(&self) {
        let cart = self.cart_screen();
        self.advance(Transition::OpenCart, Some(Modal::Cart(cart)));
    }

    fn remove_from_cart(&self, product_id: &ProductId) {
        if self.in_step(CheckoutStep::Cart, "cart:remove") {
            self.cart.remove_item(product_id);
        }
    }

    // -------------------------------------------------------------------------
    // Order step
    // -------------------------------------------------------------------------

    fn start_order(&self) {
        if !self.can(Transition::ProceedToOrder) {
            return;
        }
        if self.cart.count() == 0 {
            debug!("cart is empty, not starting checkout");
            return;
        }
        self.generation.set(self.generation.get() + 1);
        self.buyer.clear();
        self.advance(
            Transition::ProceedToOrder,
            Some(Modal::Order(OrderFormScreen::default())),
        );
        self.revalidate_order_form();
    }

    fn change_payment(&self, payment: PaymentMethod) {
        if !self.in_step(CheckoutStep::Order, "order:payment") {
            return;
        }
        self.update_order_form(|form| form.payment = Some(payment));
        self.buyer.set_data(BuyerDraft::with_payment(payment));
        self.revalidate_order_form();
    }

    fn change_address(&self, address: &str) {
        if !self.in_step(CheckoutStep::Order, "order:address") {
            return;
        }
        self.update_order_form(|form| form.address = address.to_string());
        self.buyer.set_data(BuyerDraft::with_address(address));
        self.revalidate_order_form();
    }

    fn submit_order_step(&self) {
        if !self.in_step(CheckoutStep::Order, "order:submit") {
            return;
        }
        let snapshot = match self.screens.borrow().modal.as_ref() {
            Some(Modal::Order(form)) => BuyerDraft {
                payment: form.payment,
                address: Some(form.address.clone()),
                ..BuyerDraft::default()
            },
            _ => BuyerDraft::default(),
        };
        self.buyer.set_data(snapshot);

        let result = self.buyer.validate_order();
        if !result.is_valid() {
            self.update_order_form(|form| form.form = form_state(&result, &ORDER_ERROR_PRIORITY));
            return;
        }

        let contacts = {
            let data = self.buyer.data();
            ContactsFormScreen {
                email: data.email.clone().unwrap_or_default(),
                phone: data.phone.clone().unwrap_or_default(),
                form: FormState::default(),
            }
        };
        self.advance(Transition::OrderAccepted, Some(Modal::Contacts(contacts)));
        self.revalidate_contacts_form();
    }

    fn revalidate_order_form(&self) {
        let result = self.buyer.validate_order();
        self.update_order_form(|form| form.form = form_state(&result, &ORDER_ERROR_PRIORITY));
    }

    fn update_order_form(&self, f: impl FnOnce(&mut OrderFormScreen)) {
        if let Some(Modal::Order(form)) = self.screens.borrow_mut().modal.as_mut() {
            f(form);
        }
    }

    // -------------------------------------------------------------------------
    // Contacts step
    // -------------------------------------------------------------------------

    fn change_email(&self, email: &str) {
        if !self.in_step(CheckoutStep::Contacts, "contacts:email") {
            return;
        }
        self.update_contacts_form(|form| form.email = email.to_string());
        self.buyer.set_data(BuyerDraft::with_email(email));
        self.revalidate_contacts_form();
    }

    fn change_phone(&self, phone: &str) {
        if !self.in_step(CheckoutStep::Contacts, "contacts:phone") {
            return;
        }
        self.update_contacts_form(|form| form.phone = phone.to_string());
        self.buyer.set_data(BuyerDraft::with_phone(phone));
        self.revalidate_contacts_form();
    }

    fn submit_contacts_step(&self) {
        if !self.in_step(CheckoutStep::Contacts, "contacts:submit") {
            return;
        }
        if self.is_submitting() {
            warn!("order already being submitted, ignoring repeated submit");
            self.update_contacts_form(|form| form.form = submitting_state());
            return;
        }

        let snapshot = match self.screens.borrow().modal.as_ref() {
            Some(Modal::Contacts(form)) => BuyerDraft {
                email: Some(form.email.clone()),
                phone: Some(form.phone.clone()),
                ..BuyerDraft::default()
            },
            _ => BuyerDraft::default(),
        };
        self.buyer.set_data(snapshot);

        let result = self.buyer.validate_contacts();
        if !result.is_valid() {
            self.update_contacts_form(|form| {
                form.form = form_state(&result, &CONTACTS_ERROR_PRIORITY);
            });
            return;
        }

        let full = self.buyer.validate();
        let Some(order) = self.build_order().filter(|_| full.is_valid()) else {
            warn!(?full, "buyer draft incomplete at submission");
            self.update_contacts_form(|form| form.form = form_state(&full, &FULL_ERROR_PRIORITY));
            return;
        };

        self.submit(order);
    }

    fn build_order(&self) -> Option<Order> {
        let data = self.buyer.data();
        Some(Order {
            payment: data.payment?,
            email: data.email.clone()?,
            phone: data.phone.clone()?,
            address: data.address.clone()?,
            total: self.cart.total(),
            items: self.cart.item_ids(),
        })
    }

    fn submit(&self, order: Order) {
        let generation = self.generation.get();
        info!(
            items = order.items.len(),
            total = %order.total,
            generation,
            "submitting order"
        );
        *self.in_flight.borrow_mut() = Some(InFlight {
            generation,
            items: order.items.clone(),
        });
        self.update_contacts_form(|form| form.form = submitting_state());

        let gateway = Rc::clone(&self.gateway);
        let bus = Rc::clone(&self.bus);
        let handle = tokio::task::spawn_local(async move {
            match gateway.create_order(&order).await {
                Ok(result) => bus.emit(Event::OrderPlaced { result, generation }),
                Err(e) => {
                    error!(error = %e, "order submission failed");
                    bus.emit(Event::OrderFailed {
                        message: e.to_string(),
                        generation,
                    });
                }
            }
        });
        *self.submission.borrow_mut() = Some(handle);
    }

    /// Release the in-flight slot if it belongs to `generation`.
    fn take_in_flight(&self, generation: u64) -> Option<InFlight> {
        let mut slot = self.in_flight.borrow_mut();
        if slot.as_ref().is_some_and(|f| f.generation == generation) {
            slot.take()
        } else {
            warn!(generation, "order reply without a matching request");
            None
        }
    }

    fn finish_order(&self, result: &OrderResult, generation: u64) {
        let Some(sent) = self.take_in_flight(generation) else {
            return;
        };
        info!(order_id = %result.id, total = %result.total, generation, "order placed");

        self.cart.remove_lines(&sent.items);

        if generation != self.generation.get() {
            info!(generation, "order placed for an earlier checkout");
            self.revalidate_contacts_form();
            return;
        }

        let success = SuccessScreen {
            total: result.total,
        };
        if !self.advance(Transition::OrderPlaced, Some(Modal::Success(success))) {
            info!("checkout was closed before the order completed");
        }
        self.buyer.clear();
    }

    fn fail_order(&self, message: &str, generation: u64) {
        if self.take_in_flight(generation).is_none() {
            return;
        }
        debug!(message, generation, "order failed");

        if generation != self.generation.get() {
            self.revalidate_contacts_form();
            return;
        }
        self.update_contacts_form(|form| {
            form.form = FormState {
                valid: true,
                error: SUBMIT_FAILED_MESSAGE.to_string(),
            };
        });
    }

    fn revalidate_contacts_form(&self) {
        if self.is_submitting() {
            self.update_contacts_form(|form| form.form = submitting_state());
            return;
        }
        let result = self.buyer.validate_contacts();
        self.update_contacts_form(|form| {
            form.form = form_state(&result, &CONTACTS_ERROR_PRIORITY);
        });
    }

    fn update_contacts_form(&self, f: impl FnOnce(&mut ContactsFormScreen)) {
        if let Some(Modal::Contacts(form)) = self.screens.borrow_mut().modal.as_mut() {
            f(form);
        }
    }

    // -------------------------------------------------------------------------
    // Closing
    // -------------------------------------------------------------------------

    fn close(&self) {
        self.advance(Transition::Close, None);
    }
}

fn submitting_state() -> FormState {
    FormState {
        valid: false,
        error: SUBMITTING_MESSAGE.to_string(),
    }
}

fn form_state(result: &ValidationResult, priority: &[BuyerField]) -> FormState {
    FormState {
        valid: result.is_valid(),
        error: result.first(priority).unwrap_or_default().to_string(),
    }
}
