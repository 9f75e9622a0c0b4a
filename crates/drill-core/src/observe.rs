//! Per-entity change events.
//!
//! Every entity with synchronized attributes owns an [`EventBus`]. Setters
//! emit a typed change event; handlers registered on the bus run
//! synchronously, in registration order, before the setter returns.

use std::fmt;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// An ordered list of change handlers.
pub struct EventBus<E> {
    handlers: Vec<(HandlerId, Handler<E>)>,
    next_id: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<E> EventBus<E> {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` after all existing handlers.
    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Calls every handler with `event`, in registration order.
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<u32> = EventBus::new();

        let first = Rc::clone(&log);
        bus.subscribe(move |e| first.borrow_mut().push(format!("first:{e}")));
        let second = Rc::clone(&log);
        bus.subscribe(move |e| second.borrow_mut().push(format!("second:{e}")));

        bus.emit(&7);
        assert_eq!(*log.borrow(), vec!["first:7", "second:7"]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus: EventBus<()> = EventBus::new();

        let counter = Rc::clone(&count);
        let id = bus.subscribe(move |()| *counter.borrow_mut() += 1);
        bus.emit(&());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&());

        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_handler_ids_are_unique() {
        let mut bus: EventBus<()> = EventBus::new();
        let a = bus.subscribe(|()| {});
        let b = bus.subscribe(|()| {});
        assert_ne!(a, b);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn test_debug_shows_handler_count() {
        let mut bus: EventBus<()> = EventBus::new();
        bus.subscribe(|()| {});
        assert_eq!(format!("{bus:?}"), "EventBus { handlers: 1 }");
    }
}
