//! Synchronous observer lists
//!
//! Every ledger owns one `Observers<E>` for its own event type. Handlers run
//! in subscription order at the point of the state change and cannot feed
//! state back into the engine.

use std::fmt;

/// Handle returned by `subscribe`, used to remove the handler later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

pub struct Observers<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false when the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        self.handlers.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::<u32>::new();

        let a = Rc::clone(&seen);
        observers.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        observers.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        observers.notify(&7);

        assert_eq!(observers.len(), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::<()>::new();

        let c = Rc::clone(&count);
        let id = observers.subscribe(move |_| *c.borrow_mut() += 1);

        observers.notify(&());
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&());

        assert_eq!(*count.borrow(), 1);
        assert!(observers.is_empty());
    }
}
