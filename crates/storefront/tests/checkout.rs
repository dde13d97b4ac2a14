//! Integration tests for the checkout flow.
//!
//! These drive the assembled storefront through the bus the way the terminal
//! front end does, with an in-memory order gateway in place of the HTTP API.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use larek_core::{Order, OrderId, OrderResult, PaymentMethod, Price, Product, ProductId};
use larek_storefront::api::ApiError;
use larek_storefront::checkout::{
    CheckoutStep, Modal, OrderGateway, SUBMIT_FAILED_MESSAGE, SUBMITTING_MESSAGE,
};
use larek_storefront::events::Event;
use larek_storefront::models::messages;
use larek_storefront::state::Storefront;
use tokio::task::LocalSet;

// =============================================================================
// Fixtures
// =============================================================================

/// Gateway that records every order and answers from a fixed outcome.
#[derive(Clone, Default)]
struct FakeGateway {
    orders: Rc<RefCell<Vec<Order>>>,
    reject: bool,
}

impl OrderGateway for FakeGateway {
    async fn create_order(&self, order: &Order) -> Result<OrderResult, ApiError> {
        self.orders.borrow_mut().push(order.clone());
        tokio::task::yield_now().await;
        if self.reject {
            return Err(ApiError::Api {
                status: 400,
                message: "Wrong total".to_string(),
            });
        }
        Ok(OrderResult {
            id: OrderId::from("28c57cb4-3002-4445-8aa1-2a06a5055ae5"),
            total: order.total,
        })
    }
}

fn product(id: &str, price: Option<i64>) -> Product {
    Product {
        id: ProductId::from(id),
        title: format!("Product {id}"),
        description: String::new(),
        image: format!("/{id}.svg"),
        category: "soft-skill".to_string(),
        price: price.map(Price::from_units),
    }
}

fn storefront(gateway: FakeGateway) -> Storefront<FakeGateway> {
    let shop = Storefront::new(gateway);
    shop.catalog().set_products(vec![
        product("a", Some(100)),
        product("b", None),
        product("c", Some(2500)),
    ]);
    shop
}

fn add_to_cart(shop: &Storefront<FakeGateway>, id: &str) {
    let product = shop.catalog().product_by_id(&ProductId::from(id)).unwrap();
    shop.emit(Event::CardSelect {
        product: product.clone(),
    });
    shop.emit(Event::PreviewAdd { product });
}

/// Fill the cart with `a` and walk to the contacts step.
fn checkout_to_contacts(shop: &Storefront<FakeGateway>) {
    add_to_cart(shop, "a");
    order_to_contacts(shop);
}

/// Open the cart and fill the order step.
fn order_to_contacts(shop: &Storefront<FakeGateway>) {
    shop.emit(Event::CartOpen);
    shop.emit(Event::CartOrder);
    shop.emit(Event::PaymentChange {
        payment: PaymentMethod::Card,
    });
    shop.emit(Event::AddressChange {
        address: "Lenina 5".to_string(),
    });
    shop.emit(Event::OrderSubmit);
    assert_eq!(shop.checkout().step(), CheckoutStep::Contacts);
}

fn fill_contacts(shop: &Storefront<FakeGateway>, email: &str) {
    shop.emit(Event::EmailChange {
        email: email.to_string(),
    });
    shop.emit(Event::PhoneChange {
        phone: "79990000000".to_string(),
    });
}

fn form_error(shop: &Storefront<FakeGateway>) -> (bool, String) {
    match shop.checkout().screens().modal.as_ref() {
        Some(Modal::Order(order)) => (order.form.valid, order.form.error.clone()),
        Some(Modal::Contacts(contacts)) => (contacts.form.valid, contacts.form.error.clone()),
        other => panic!("no form open: {other:?}"),
    }
}

// =============================================================================
// Browsing and cart
// =============================================================================

#[test]
fn test_gallery_and_header_follow_models() {
    let shop = storefront(FakeGateway::default());
    assert_eq!(shop.checkout().screens().gallery.len(), 3);
    assert_eq!(shop.checkout().screens().header.counter, 0);

    add_to_cart(&shop, "a");
    add_to_cart(&shop, "c");
    assert_eq!(shop.checkout().screens().header.counter, 2);
    assert_eq!(shop.checkout().step(), CheckoutStep::Browsing);
    assert_eq!(shop.cart().total(), Price::from_units(2600));
}

#[test]
fn test_priceless_product_cannot_be_added() {
    let shop = storefront(FakeGateway::default());
    add_to_cart(&shop, "b");

    assert_eq!(shop.cart().count(), 0);
    assert_eq!(shop.checkout().step(), CheckoutStep::Preview);
    match shop.checkout().screens().modal.as_ref() {
        Some(Modal::Preview(preview)) => assert!(!preview.can_buy),
        other => panic!("expected preview, got {other:?}"),
    }
}

#[test]
fn test_preview_shows_remove_for_product_in_cart() {
    let shop = storefront(FakeGateway::default());
    add_to_cart(&shop, "a");

    let product = shop.catalog().product_by_id(&ProductId::from("a")).unwrap();
    shop.emit(Event::CardSelect { product });
    match shop.checkout().screens().modal.as_ref() {
        Some(Modal::Preview(preview)) => assert!(preview.in_cart),
        other => panic!("expected preview, got {other:?}"),
    }

    shop.emit(Event::PreviewRemove {
        product_id: ProductId::from("a"),
    });
    assert_eq!(shop.cart().count(), 0);
    assert_eq!(shop.checkout().step(), CheckoutStep::Browsing);
}

#[test]
fn test_cart_view_refreshes_on_removal() {
    let shop = storefront(FakeGateway::default());
    add_to_cart(&shop, "a");
    add_to_cart(&shop, "c");
    shop.emit(Event::CartOpen);

    shop.emit(Event::CartRemove {
        product_id: ProductId::from("a"),
    });

    let screens = shop.checkout().screens();
    let Some(Modal::Cart(cart)) = screens.modal.as_ref() else {
        panic!("expected cart, got {:?}", screens.modal);
    };
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].index, 1);
    assert_eq!(cart.total, Price::from_units(2500));
    assert_eq!(screens.header.counter, 1);
}

#[test]
fn test_order_from_empty_cart_is_ignored() {
    let shop = storefront(FakeGateway::default());
    shop.emit(Event::CartOpen);
    shop.emit(Event::CartOrder);

    assert_eq!(shop.checkout().step(), CheckoutStep::Cart);
    match shop.checkout().screens().modal.as_ref() {
        Some(Modal::Cart(cart)) => assert!(!cart.can_order),
        other => panic!("expected cart, got {other:?}"),
    }
}

// =============================================================================
// Form validation
// =============================================================================

#[test]
fn test_order_form_reports_address_before_payment() {
    let shop = storefront(FakeGateway::default());
    add_to_cart(&shop, "a");
    shop.emit(Event::CartOpen);
    shop.emit(Event::CartOrder);
    assert_eq!(shop.checkout().step(), CheckoutStep::Order);
    assert_eq!(form_error(&shop), (false, messages::ADDRESS.to_string()));

    shop.emit(Event::AddressChange {
        address: "Lenina 5".to_string(),
    });
    assert_eq!(form_error(&shop), (false, messages::PAYMENT.to_string()));

    shop.emit(Event::PaymentChange {
        payment: PaymentMethod::Cash,
    });
    assert_eq!(form_error(&shop), (true, String::new()));
}

#[test]
fn test_blank_address_blocks_order_step() {
    let shop = storefront(FakeGateway::default());
    add_to_cart(&shop, "a");
    shop.emit(Event::CartOpen);
    shop.emit(Event::CartOrder);
    shop.emit(Event::PaymentChange {
        payment: PaymentMethod::Card,
    });
    shop.emit(Event::AddressChange {
        address: "   ".to_string(),
    });
    shop.emit(Event::OrderSubmit);

    assert_eq!(shop.checkout().step(), CheckoutStep::Order);
    assert_eq!(form_error(&shop), (false, messages::ADDRESS.to_string()));
}

#[tokio::test]
async fn test_empty_email_blocks_submission() {
    LocalSet::new()
        .run_until(async {
            let gateway = FakeGateway::default();
            let orders = Rc::clone(&gateway.orders);
            let shop = storefront(gateway);
            checkout_to_contacts(&shop);

            shop.emit(Event::EmailChange {
                email: String::new(),
            });
            shop.emit(Event::PhoneChange {
                phone: "79990000000".to_string(),
            });
            shop.emit(Event::ContactsSubmit);
            shop.checkout().wait_for_submission().await;

            assert!(orders.borrow().is_empty());
            assert!(!shop.checkout().is_submitting());
            assert_eq!(shop.checkout().step(), CheckoutStep::Contacts);
            assert_eq!(form_error(&shop), (false, messages::EMAIL.to_string()));
        })
        .await;
}

#[test]
fn test_preview_closes_when_product_leaves_catalog() {
    let shop = storefront(FakeGateway::default());
    let a = shop.catalog().product_by_id(&ProductId::from("a")).unwrap();
    shop.emit(Event::CardSelect { product: a.clone() });
    assert_eq!(shop.checkout().step(), CheckoutStep::Preview);

    shop.catalog()
        .set_products(vec![product("b", None), product("c", Some(2500))]);

    assert_eq!(shop.checkout().step(), CheckoutStep::Browsing);
    assert!(shop.checkout().screens().modal.is_none());
    assert_eq!(shop.checkout().screens().gallery.len(), 2);

    shop.emit(Event::PreviewAdd { product: a });
    assert_eq!(shop.cart().count(), 0);
}

#[test]
fn test_delisted_product_cannot_be_added_from_open_preview() {
    let shop = storefront(FakeGateway::default());
    let c = shop.catalog().product_by_id(&ProductId::from("c")).unwrap();
    shop.emit(Event::CardSelect { product: c });
    assert_eq!(shop.checkout().step(), CheckoutStep::Preview);

    // The preview stays open for a product that is still listed.
    shop.catalog()
        .set_products(vec![product("a", Some(100)), product("c", Some(2500))]);
    assert_eq!(shop.checkout().step(), CheckoutStep::Preview);

    shop.emit(Event::PreviewAdd {
        product: product("gone", Some(10)),
    });
    assert_eq!(shop.cart().count(), 0);
    assert_eq!(shop.checkout().step(), CheckoutStep::Preview);
}

#[test]
fn test_card_select_outside_browsing_keeps_selection() {
    let shop = storefront(FakeGateway::default());
    add_to_cart(&shop, "a");
    assert_eq!(
        shop.catalog().selected_product().map(|p| p.id),
        Some(ProductId::from("a"))
    );

    shop.emit(Event::CartOpen);
    let c = shop.catalog().product_by_id(&ProductId::from("c")).unwrap();
    shop.emit(Event::CardSelect { product: c });

    assert_eq!(shop.checkout().step(), CheckoutStep::Cart);
    assert!(matches!(
        shop.checkout().screens().modal,
        Some(Modal::Cart(_))
    ));
    assert_eq!(
        shop.catalog().selected_product().map(|p| p.id),
        Some(ProductId::from("a"))
    );
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_successful_order_clears_cart_and_draft() {
    LocalSet::new()
        .run_until(async {
            let gateway = FakeGateway::default();
            let orders = Rc::clone(&gateway.orders);
            let shop = storefront(gateway);
            checkout_to_contacts(&shop);

            shop.emit(Event::EmailChange {
                email: "shopper@example.com".to_string(),
            });
            shop.emit(Event::PhoneChange {
                phone: "+7 999 000 00 00".to_string(),
            });
            shop.emit(Event::ContactsSubmit);
            assert!(shop.checkout().is_submitting());
            shop.checkout().wait_for_submission().await;

            let orders = orders.borrow();
            assert_eq!(orders.len(), 1);
            let order = &orders[0];
            assert_eq!(order.payment, PaymentMethod::Card);
            assert_eq!(order.address, "Lenina 5");
            assert_eq!(order.email, "shopper@example.com");
            assert_eq!(order.total, Price::from_units(100));
            assert_eq!(order.items, vec![ProductId::from("a")]);

            assert_eq!(shop.checkout().step(), CheckoutStep::Success);
            match shop.checkout().screens().modal.as_ref() {
                Some(Modal::Success(success)) => {
                    assert_eq!(success.total, Price::from_units(100));
                }
                other => panic!("expected success, got {other:?}"),
            }
            assert_eq!(shop.cart().count(), 0);
            assert!(shop.buyer().data().is_empty());
            assert_eq!(shop.checkout().screens().header.counter, 0);

            shop.emit(Event::SuccessClose);
            assert_eq!(shop.checkout().step(), CheckoutStep::Browsing);
            assert!(shop.checkout().screens().modal.is_none());
        })
        .await;
}

#[tokio::test]
async fn test_failed_order_keeps_state() {
    LocalSet::new()
        .run_until(async {
            let gateway = FakeGateway {
                reject: true,
                ..FakeGateway::default()
            };
            let shop = storefront(gateway);
            checkout_to_contacts(&shop);

            shop.emit(Event::EmailChange {
                email: "shopper@example.com".to_string(),
            });
            shop.emit(Event::PhoneChange {
                phone: "79990000000".to_string(),
            });
            shop.emit(Event::ContactsSubmit);
            shop.checkout().wait_for_submission().await;

            assert!(!shop.checkout().is_submitting());
            assert_eq!(shop.checkout().step(), CheckoutStep::Contacts);
            assert_eq!(form_error(&shop), (true, SUBMIT_FAILED_MESSAGE.to_string()));
            assert_eq!(shop.cart().count(), 1);
            assert_eq!(
                shop.buyer().data().email.as_deref(),
                Some("shopper@example.com")
            );
        })
        .await;
}

#[tokio::test]
async fn test_repeated_submit_sends_one_order() {
    LocalSet::new()
        .run_until(async {
            let gateway = FakeGateway::default();
            let orders = Rc::clone(&gateway.orders);
            let shop = storefront(gateway);
            checkout_to_contacts(&shop);

            shop.emit(Event::EmailChange {
                email: "shopper@example.com".to_string(),
            });
            shop.emit(Event::PhoneChange {
                phone: "79990000000".to_string(),
            });
            shop.emit(Event::ContactsSubmit);
            assert_eq!(form_error(&shop), (false, SUBMITTING_MESSAGE.to_string()));
            shop.emit(Event::ContactsSubmit);
            assert_eq!(form_error(&shop), (false, SUBMITTING_MESSAGE.to_string()));
            shop.checkout().wait_for_submission().await;

            assert_eq!(orders.borrow().len(), 1);
            assert_eq!(shop.checkout().step(), CheckoutStep::Success);
        })
        .await;
}

#[tokio::test]
async fn test_closing_during_submission_still_clears_models() {
    LocalSet::new()
        .run_until(async {
            let shop = storefront(FakeGateway::default());
            checkout_to_contacts(&shop);

            shop.emit(Event::EmailChange {
                email: "shopper@example.com".to_string(),
            });
            shop.emit(Event::PhoneChange {
                phone: "79990000000".to_string(),
            });
            shop.emit(Event::ContactsSubmit);
            shop.emit(Event::ModalClose);
            shop.checkout().wait_for_submission().await;

            assert_eq!(shop.checkout().step(), CheckoutStep::Browsing);
            assert!(shop.checkout().screens().modal.is_none());
            assert_eq!(shop.cart().count(), 0);
            assert!(shop.buyer().data().is_empty());
        })
        .await;
}

#[tokio::test]
async fn test_new_checkout_starts_from_empty_draft() {
    LocalSet::new()
        .run_until(async {
            let shop = storefront(FakeGateway::default());
            checkout_to_contacts(&shop);
            shop.emit(Event::ModalClose);

            shop.emit(Event::CartOpen);
            shop.emit(Event::CartOrder);

            assert!(shop.buyer().data().is_empty());
            match shop.checkout().screens().modal.as_ref() {
                Some(Modal::Order(order)) => {
                    assert_eq!(order.payment, None);
                    assert!(order.address.is_empty());
                }
                other => panic!("expected order form, got {other:?}"),
            }
        })
        .await;
}

#[tokio::test]
async fn test_earlier_order_reply_leaves_new_checkout_alone() {
    LocalSet::new()
        .run_until(async {
            let gateway = FakeGateway::default();
            let orders = Rc::clone(&gateway.orders);
            let shop = storefront(gateway);
            checkout_to_contacts(&shop);
            fill_contacts(&shop, "first@example.com");
            shop.emit(Event::ContactsSubmit);
            let first = shop.checkout().generation();

            // Close while the request is pending and start another checkout.
            shop.emit(Event::ModalClose);
            add_to_cart(&shop, "c");
            order_to_contacts(&shop);
            assert!(shop.checkout().generation() > first);
            assert_eq!(form_error(&shop), (false, SUBMITTING_MESSAGE.to_string()));
            fill_contacts(&shop, "second@example.com");

            shop.checkout().wait_for_submission().await;

            assert!(!shop.checkout().is_submitting());
            assert_eq!(shop.checkout().step(), CheckoutStep::Contacts);
            assert_eq!(form_error(&shop), (true, String::new()));
            assert_eq!(shop.cart().item_ids(), vec![ProductId::from("c")]);
            assert_eq!(shop.checkout().screens().header.counter, 1);
            assert_eq!(shop.buyer().data().address.as_deref(), Some("Lenina 5"));
            assert_eq!(
                shop.buyer().data().email.as_deref(),
                Some("second@example.com")
            );

            shop.emit(Event::ContactsSubmit);
            shop.checkout().wait_for_submission().await;

            let orders = orders.borrow();
            assert_eq!(orders.len(), 2);
            assert_eq!(orders[0].items, vec![ProductId::from("a")]);
            assert_eq!(orders[1].items, vec![ProductId::from("c")]);
            assert_eq!(orders[1].total, Price::from_units(2500));
            assert_eq!(shop.checkout().step(), CheckoutStep::Success);
            assert_eq!(shop.cart().count(), 0);
        })
        .await;
}

#[tokio::test]
async fn test_earlier_order_failure_does_not_mark_new_checkout() {
    LocalSet::new()
        .run_until(async {
            let gateway = FakeGateway {
                reject: true,
                ..FakeGateway::default()
            };
            let orders = Rc::clone(&gateway.orders);
            let shop = storefront(gateway);
            checkout_to_contacts(&shop);
            fill_contacts(&shop, "first@example.com");
            shop.emit(Event::ContactsSubmit);

            shop.emit(Event::ModalClose);
            order_to_contacts(&shop);
            fill_contacts(&shop, "second@example.com");
            shop.emit(Event::ContactsSubmit);
            assert_eq!(form_error(&shop), (false, SUBMITTING_MESSAGE.to_string()));

            shop.checkout().wait_for_submission().await;

            assert_eq!(orders.borrow().len(), 1);
            assert_eq!(shop.checkout().step(), CheckoutStep::Contacts);
            assert_eq!(form_error(&shop), (true, String::new()));
            assert_eq!(shop.cart().count(), 1);

            shop.emit(Event::ContactsSubmit);
            shop.checkout().wait_for_submission().await;

            assert_eq!(orders.borrow().len(), 2);
            assert_eq!(form_error(&shop), (true, SUBMIT_FAILED_MESSAGE.to_string()));
        })
        .await;
}
