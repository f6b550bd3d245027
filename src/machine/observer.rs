//! Change notification subscribers.

use crate::core::StateKey;
use std::rc::Rc;

/// Identifies a subscription so it can be removed later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type ChangeListener<K> = Rc<dyn Fn(&K, &K)>;

/// Listeners invoked with `(previous, next)` after each completed transition.
pub(crate) struct Observers<K: StateKey> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ChangeListener<K>)>,
}

impl<K: StateKey> Observers<K> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, listener: ChangeListener<K>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Listeners in registration order, detached from the list so they can
    /// run without it being borrowed.
    pub(crate) fn snapshot(&self) -> Vec<ChangeListener<K>> {
        self.listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn snapshot_preserves_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<u8> = Observers::new();

        for tag in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            observers.subscribe(Rc::new(move |_: &u8, _: &u8| calls.borrow_mut().push(tag)));
        }

        for listener in observers.snapshot() {
            listener(&0, &1);
        }
        assert_eq!(*calls.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let mut observers: Observers<u8> = Observers::new();
        let a = observers.subscribe(Rc::new(|_: &u8, _: &u8| {}));
        let b = observers.subscribe(Rc::new(|_: &u8, _: &u8| {}));

        assert_ne!(a, b);
        assert!(observers.unsubscribe(a));
        assert!(!observers.unsubscribe(a));
        assert_eq!(observers.len(), 1);
    }
}
