//! Line-oriented terminal front end.
//!
//! Each input line parses into a [`Command`]. A command either becomes one
//! bus [`Event`] or a read-only [`Action`] such as listing the catalog. The
//! [`TerminalView`] renders [`Screens`] snapshots as plain text.

use std::fmt::Write as _;
use std::str::FromStr;

use larek_core::{PaymentMethod, Price, ProductId};
use thiserror::Error;
use url::Url;

use crate::checkout::{
    CardScreen, CartScreen, CheckoutStep, ContactsFormScreen, FormState, Modal, OrderFormScreen,
    OrderGateway, PreviewScreen, Screens, SuccessScreen, View,
};
use crate::events::Event;
use crate::state::Storefront;

pub const HELP: &str = "\
Commands:
  list               show the catalog
  show <n|id>        preview a product
  add | remove       add or remove the previewed product
  cart               open the cart
  delete <n>         delete cart line n
  order              start checkout
  pay card|cash      choose a payment method
  address <text>     set the delivery address
  next               continue to contacts
  email <text>       set the email
  phone <text>       set the phone
  submit             place the order
  close              close the current window
  help               show this help
  quit               exit";

/// Errors raised while reading a terminal command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminalError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0} (type 'help')")]
    UnknownCommand(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid argument for '{0}': {1}")]
    InvalidArgument(&'static str, String),
    #[error("No such product: {0}")]
    NoSuchProduct(String),
    #[error("No cart line {0}")]
    NoSuchLine(usize),
    #[error("No product is being previewed")]
    NothingSelected,
}

/// How `show` names a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    /// 1-based gallery position.
    Position(usize),
    Id(ProductId),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show(ProductRef),
    Add,
    Remove,
    Cart,
    /// 1-based cart line.
    Delete(usize),
    Order,
    Pay(PaymentMethod),
    Address(String),
    Next,
    Email(String),
    Phone(String),
    Submit,
    Close,
    Quit,
}

/// What the front end should do with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Emit(Event),
    Help,
    List,
    Quit,
}

impl FromStr for Command {
    type Err = TerminalError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, arg)| (name, arg.trim()));

        let command = match name.to_lowercase().as_str() {
            "" => return Err(TerminalError::Empty),
            "help" | "?" => Self::Help,
            "list" | "ls" => Self::List,
            "show" => Self::Show(parse_product_ref(arg)?),
            "add" => Self::Add,
            "remove" => Self::Remove,
            "cart" => Self::Cart,
            "delete" | "del" => Self::Delete(parse_position("delete", arg)?),
            "order" => Self::Order,
            "pay" => {
                if arg.is_empty() {
                    return Err(TerminalError::MissingArgument("pay"));
                }
                Self::Pay(
                    arg.parse()
                        .map_err(|e| TerminalError::InvalidArgument("pay", e))?,
                )
            }
            "address" => Self::Address(arg.to_string()),
            "next" => Self::Next,
            "email" => Self::Email(arg.to_string()),
            "phone" => Self::Phone(arg.to_string()),
            "submit" => Self::Submit,
            "close" => Self::Close,
            "quit" | "exit" => Self::Quit,
            other => return Err(TerminalError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn parse_position(command: &'static str, arg: &str) -> Result<usize, TerminalError> {
    if arg.is_empty() {
        return Err(TerminalError::MissingArgument(command));
    }
    match arg.parse::<usize>() {
        Ok(0) => Err(TerminalError::InvalidArgument(
            command,
            "positions start at 1".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(e) => Err(TerminalError::InvalidArgument(command, e.to_string())),
    }
}

fn parse_product_ref(arg: &str) -> Result<ProductRef, TerminalError> {
    if arg.is_empty() {
        return Err(TerminalError::MissingArgument("show"));
    }
    if arg.bytes().all(|b| b.is_ascii_digit()) {
        return parse_position("show", arg).map(ProductRef::Position);
    }
    Ok(ProductRef::Id(ProductId::from(arg)))
}

impl Command {
    /// Resolve the command against the current storefront state.
    ///
    /// # Errors
    ///
    /// Returns `TerminalError` if the command names a product or cart line
    /// that does not exist.
    pub fn resolve<G: OrderGateway + 'static>(
        self,
        shop: &Storefront<G>,
    ) -> Result<Action, TerminalError> {
        let event = match self {
            Self::Help => return Ok(Action::Help),
            Self::List => return Ok(Action::List),
            Self::Quit => return Ok(Action::Quit),
            Self::Show(reference) => {
                let product = match &reference {
                    ProductRef::Position(n) => shop
                        .catalog()
                        .products()
                        .get(n.wrapping_sub(1))
                        .cloned()
                        .ok_or_else(|| TerminalError::NoSuchProduct(n.to_string()))?,
                    ProductRef::Id(id) => shop
                        .catalog()
                        .product_by_id(id)
                        .ok_or_else(|| TerminalError::NoSuchProduct(id.to_string()))?,
                };
                Event::CardSelect { product }
            }
            Self::Add => Event::PreviewAdd {
                product: shop
                    .catalog()
                    .selected_product()
                    .ok_or(TerminalError::NothingSelected)?,
            },
            Self::Remove => Event::PreviewRemove {
                product_id: shop
                    .catalog()
                    .selected_product()
                    .ok_or(TerminalError::NothingSelected)?
                    .id,
            },
            Self::Cart => Event::CartOpen,
            Self::Delete(n) => Event::CartRemove {
                product_id: shop
                    .cart()
                    .items()
                    .get(n.wrapping_sub(1))
                    .map(|product| product.id.clone())
                    .ok_or(TerminalError::NoSuchLine(n))?,
            },
            Self::Order => Event::CartOrder,
            Self::Pay(payment) => Event::PaymentChange { payment },
            Self::Address(address) => Event::AddressChange { address },
            Self::Next => Event::OrderSubmit,
            Self::Email(email) => Event::EmailChange { email },
            Self::Phone(phone) => Event::PhoneChange { phone },
            Self::Submit => Event::ContactsSubmit,
            Self::Close => {
                if shop.checkout().step() == CheckoutStep::Success {
                    Event::SuccessClose
                } else {
                    Event::ModalClose
                }
            }
        };
        Ok(Action::Emit(event))
    }
}

/// Renders screens as plain text.
#[derive(Debug, Clone)]
pub struct TerminalView {
    cdn_base_url: Url,
}

impl TerminalView {
    #[must_use]
    pub const fn new(cdn_base_url: Url) -> Self {
        Self { cdn_base_url }
    }

    /// The numbered catalog.
    #[must_use]
    pub fn render_gallery(gallery: &[CardScreen]) -> String {
        if gallery.is_empty() {
            return "The catalog is empty.\n".to_string();
        }
        let mut out = String::new();
        for (i, card) in gallery.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. [{}] {} - {}",
                i + 1,
                card.category,
                card.title,
                Price::display_optional(card.price)
            );
        }
        out
    }

    fn render_preview(&self, out: &mut String, preview: &PreviewScreen) {
        let product = &preview.product;
        let _ = writeln!(out, "== {} ==", product.title);
        let _ = writeln!(out, "[{}]", product.category);
        if !product.description.is_empty() {
            let _ = writeln!(out, "{}", product.description);
        }
        if let Ok(url) = product.image_url(&self.cdn_base_url) {
            let _ = writeln!(out, "image: {url}");
        }
        let _ = writeln!(out, "{}", Price::display_optional(product.price));
        let button = if !preview.can_buy {
            "(not for sale)"
        } else if preview.in_cart {
            "> remove"
        } else {
            "> add"
        };
        let _ = writeln!(out, "{button}");
    }

    fn render_cart(out: &mut String, cart: &CartScreen) {
        let _ = writeln!(out, "== Cart ==");
        if cart.lines.is_empty() {
            let _ = writeln!(out, "The cart is empty.");
        }
        for line in &cart.lines {
            let _ = writeln!(
                out,
                "{:>3}. {} - {}",
                line.index,
                line.title,
                Price::display_optional(line.price)
            );
        }
        let _ = writeln!(out, "Total: {}", cart.total);
        if cart.can_order {
            let _ = writeln!(out, "> order");
        }
    }

    fn render_form(out: &mut String, form: &FormState, submit: &str) {
        if !form.error.is_empty() {
            let _ = writeln!(out, "! {}", form.error);
        }
        if form.valid {
            let _ = writeln!(out, "> {submit}");
        }
    }

    fn render_order(out: &mut String, order: &OrderFormScreen) {
        let _ = writeln!(out, "== Order ==");
        let payment = order
            .payment
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let _ = writeln!(out, "Payment: {payment}");
        let _ = writeln!(out, "Address: {}", order.address);
        Self::render_form(out, &order.form, "next");
    }

    fn render_contacts(out: &mut String, contacts: &ContactsFormScreen) {
        let _ = writeln!(out, "== Contacts ==");
        let _ = writeln!(out, "Email: {}", contacts.email);
        let _ = writeln!(out, "Phone: {}", contacts.phone);
        Self::render_form(out, &contacts.form, "submit");
    }

    fn render_success(out: &mut String, success: &SuccessScreen) {
        let _ = writeln!(out, "== Order placed ==");
        let _ = writeln!(out, "Charged {}", success.total);
    }
}

impl View for TerminalView {
    type Snapshot = Screens;
    type Output = String;

    fn render(&self, screens: &Screens) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[cart: {}]", screens.header.counter);
        match &screens.modal {
            None => out.push_str(&Self::render_gallery(&screens.gallery)),
            Some(Modal::Preview(preview)) => self.render_preview(&mut out, preview),
            Some(Modal::Cart(cart)) => Self::render_cart(&mut out, cart),
            Some(Modal::Order(order)) => Self::render_order(&mut out, order),
            Some(Modal::Contacts(contacts)) => Self::render_contacts(&mut out, contacts),
            Some(Modal::Success(success)) => Self::render_success(&mut out, success),
        }
        out
    }
}
