//! Buyer checkout draft and its validators.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use larek_core::{BuyerDraft, BuyerField};
use serde::Serialize;

use crate::events::{Event, EventBus};

/// Messages shown for missing fields.
pub mod messages {
    pub const PAYMENT: &str = "no payment method selected";
    pub const EMAIL: &str = "enter email";
    pub const PHONE: &str = "enter phone";
    pub const ADDRESS: &str = "enter delivery address";
}

const fn message_for(field: BuyerField) -> &'static str {
    match field {
        BuyerField::Payment => messages::PAYMENT,
        BuyerField::Email => messages::EMAIL,
        BuyerField::Phone => messages::PHONE,
        BuyerField::Address => messages::ADDRESS,
    }
}

/// Field errors found by a validator. A field without a message is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'static str>,
}

impl ValidationResult {
    /// Whether every checked field passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.payment.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }

    /// The message recorded for `field`.
    #[must_use]
    pub const fn get(&self, field: BuyerField) -> Option<&'static str> {
        match field {
            BuyerField::Payment => self.payment,
            BuyerField::Email => self.email,
            BuyerField::Phone => self.phone,
            BuyerField::Address => self.address,
        }
    }

    /// The first message in `priority` order, for forms with a single error slot.
    #[must_use]
    pub fn first(&self, priority: &[BuyerField]) -> Option<&'static str> {
        priority.iter().find_map(|&field| self.get(field))
    }

    const fn set(&mut self, field: BuyerField, message: &'static str) {
        match field {
            BuyerField::Payment => self.payment = Some(message),
            BuyerField::Email => self.email = Some(message),
            BuyerField::Phone => self.phone = Some(message),
            BuyerField::Address => self.address = Some(message),
        }
    }
}

/// Owns the buyer's checkout draft.
///
/// Missing or blank fields are reported by the validators; they are never
/// errors of the model itself.
pub struct BuyerModel {
    bus: Rc<EventBus>,
    data: RefCell<BuyerDraft>,
}

impl BuyerModel {
    /// Create a model with an empty draft.
    #[must_use]
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            data: RefCell::new(BuyerDraft::default()),
        }
    }

    /// Merge `partial` into the draft and emit `buyer:changed` once.
    pub fn set_data(&self, partial: BuyerDraft) {
        self.data.borrow_mut().merge(partial);
        self.bus.emit(Event::BuyerChanged);
    }

    /// The current draft.
    #[must_use]
    pub fn data(&self) -> Ref<'_, BuyerDraft> {
        self.data.borrow()
    }

    /// Reset the draft and emit `buyer:changed`.
    pub fn clear(&self) {
        *self.data.borrow_mut() = BuyerDraft::default();
        self.bus.emit(Event::BuyerChanged);
    }

    /// Order step: payment and address.
    #[must_use]
    pub fn validate_order(&self) -> ValidationResult {
        self.check(&[BuyerField::Payment, BuyerField::Address])
    }

    /// Contacts step: email and phone.
    #[must_use]
    pub fn validate_contacts(&self) -> ValidationResult {
        self.check(&[BuyerField::Email, BuyerField::Phone])
    }

    /// All four fields.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        self.check(&BuyerField::ALL)
    }

    /// Message for a single field, or `None` if it is filled in.
    #[must_use]
    pub fn validate_field(&self, field: BuyerField) -> Option<&'static str> {
        (!self.data.borrow().is_present(field)).then(|| message_for(field))
    }

    fn check(&self, fields: &[BuyerField]) -> ValidationResult {
        let data = self.data.borrow();
        let mut result = ValidationResult::default();
        for &field in fields {
            if !data.is_present(field) {
                result.set(field, message_for(field));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use larek_core::PaymentMethod;

    fn model() -> (Rc<EventBus>, BuyerModel) {
        let bus = Rc::new(EventBus::new());
        let model = BuyerModel::new(Rc::clone(&bus));
        (bus, model)
    }

    #[test]
    fn test_empty_draft_fails_every_validator() {
        let (_bus, model) = model();
        let order = model.validate_order();
        assert_eq!(order.payment, Some(messages::PAYMENT));
        assert_eq!(order.address, Some(messages::ADDRESS));
        assert_eq!(order.email, None);

        let contacts = model.validate_contacts();
        assert_eq!(contacts.email, Some(messages::EMAIL));
        assert_eq!(contacts.phone, Some(messages::PHONE));
        assert_eq!(contacts.payment, None);

        assert!(!model.validate().is_valid());
    }

    #[test]
    fn test_payment_only_leaves_address_error() {
        let (_bus, model) = model();
        model.set_data(BuyerDraft::with_payment(PaymentMethod::Card));

        assert_eq!(
            model.validate_order(),
            ValidationResult {
                address: Some(messages::ADDRESS),
                ..ValidationResult::default()
            }
        );
    }

    #[test]
    fn test_step_validators_pass_independently() {
        let (_bus, model) = model();
        model.set_data(BuyerDraft::with_payment(PaymentMethod::Cash));
        model.set_data(BuyerDraft::with_address("Moscow"));
        assert!(model.validate_order().is_valid());
        assert!(!model.validate_contacts().is_valid());

        model.set_data(BuyerDraft::with_email("a@b.c"));
        model.set_data(BuyerDraft::with_phone("79990000000"));
        assert!(model.validate_contacts().is_valid());
        assert!(model.validate().is_valid());
    }

    #[test]
    fn test_blank_strings_are_invalid() {
        let (_bus, model) = model();
        model.set_data(BuyerDraft {
            email: Some(String::new()),
            phone: Some("79990000000".to_string()),
            ..BuyerDraft::default()
        });

        let result = model.validate_contacts();
        assert_eq!(result.email, Some(messages::EMAIL));
        assert_eq!(result.phone, None);

        model.set_data(BuyerDraft::with_address(" \t "));
        assert_eq!(model.validate_field(BuyerField::Address), Some(messages::ADDRESS));
        assert_eq!(model.validate_field(BuyerField::Phone), None);
    }

    #[test]
    fn test_set_data_merges_and_emits_once() {
        let (bus, model) = model();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        bus.on(EventKind::BuyerChanged, move |_| *sink.borrow_mut() += 1);

        model.set_data(BuyerDraft::with_email("test@example.com"));
        model.set_data(BuyerDraft {
            phone: Some("+79991234567".to_string()),
            address: Some("Primernaya 1".to_string()),
            ..BuyerDraft::default()
        });

        assert_eq!(*count.borrow(), 2);
        let data = model.data();
        assert_eq!(data.email.as_deref(), Some("test@example.com"));
        assert_eq!(data.phone.as_deref(), Some("+79991234567"));
    }

    #[test]
    fn test_clear_resets_draft() {
        let (_bus, model) = model();
        model.set_data(BuyerDraft::with_payment(PaymentMethod::Card));
        model.clear();
        assert!(model.data().is_empty());
    }

    #[test]
    fn test_first_respects_priority() {
        let (_bus, model) = model();
        let result = model.validate_order();
        assert_eq!(
            result.first(&[BuyerField::Address, BuyerField::Payment]),
            Some(messages::ADDRESS)
        );
        assert_eq!(
            result.first(&[BuyerField::Payment, BuyerField::Address]),
            Some(messages::PAYMENT)
        );
        assert_eq!(ValidationResult::default().first(&BuyerField::ALL), None);
    }
}
