//! Synchronous publish/subscribe bus.
//!
//! Every storefront component talks to the others through an [`EventBus`]:
//! view adapters emit user intents, models emit change notifications, and the
//! checkout orchestrator reacts to both.
//!
//! # Delivery
//!
//! - `emit` runs every handler subscribed to the event's kind, in
//!   registration order, before it returns.
//! - A handler may emit again; the nested emit is delivered depth-first,
//!   before the outer emit moves on to its next handler.
//! - The set of handlers is fixed when `emit` starts. Handlers registered or
//!   removed while an emit is running take effect from the next emit.
//! - Emitting an event nobody listens to does nothing.
//!
//! The bus is single-threaded (`Rc`, `RefCell`) and never queues.

mod event;

pub use event::{Event, EventKind};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

type Handler = Rc<dyn Fn(&Event)>;

/// Identifies a registered handler so it can be removed with [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Subscription {
    id: HandlerId,
    /// `None` subscribes to every event.
    kind: Option<EventKind>,
    handler: Handler,
}

impl Subscription {
    fn matches(&self, kind: EventKind) -> bool {
        self.kind.is_none_or(|k| k == kind)
    }
}

/// Publish/subscribe broker shared by every storefront component.
pub struct EventBus {
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe `handler` to events of `kind`.
    pub fn on(&self, kind: EventKind, handler: impl Fn(&Event) + 'static) -> HandlerId {
        self.subscribe(Some(kind), Rc::new(handler))
    }

    /// Subscribe `handler` to every event.
    pub fn on_all(&self, handler: impl Fn(&Event) + 'static) -> HandlerId {
        self.subscribe(None, Rc::new(handler))
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn off(&self, id: HandlerId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Deliver `event` to every matching handler, synchronously.
    pub fn emit(&self, event: Event) {
        let kind = event.kind();

        // Release the borrow before calling out so handlers can subscribe or emit.
        let handlers: Vec<Handler> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.matches(kind))
            .map(|s| Rc::clone(&s.handler))
            .collect();

        debug!(event = kind.as_str(), handlers = handlers.len(), "emit");

        for handler in &handlers {
            handler(&event);
        }
    }

    /// Number of handlers an event of `kind` would reach.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.matches(kind))
            .count()
    }

    fn subscribe(&self, kind: Option<EventKind>, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions
            .borrow_mut()
            .push(Subscription { id, kind, handler });
        id
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish_non_exhaustive()
    }
}
