//! Append-only mapping from state keys to their handlers.

use super::error::MachineError;
use crate::core::{StateHandler, StateKey};
use std::collections::HashMap;
use std::rc::Rc;

/// Shared pointer to a registered handler.
pub type HandlerRef<K, C = ()> = Rc<dyn StateHandler<K, C>>;

/// Registered handlers, one per key.
///
/// Entries are never replaced or removed; they live as long as the machine.
pub struct StateRegistry<K: StateKey, C: 'static = ()> {
    handlers: HashMap<K, HandlerRef<K, C>>,
    order: Vec<K>,
}

impl<K: StateKey, C: 'static> StateRegistry<K, C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Store `handler` under `key`.
    ///
    /// Fails with `DuplicateState` if `key` is taken; the original entry is kept.
    pub fn register(&mut self, key: K, handler: HandlerRef<K, C>) -> Result<(), MachineError> {
        if self.handlers.contains_key(&key) {
            return Err(MachineError::duplicate(&key));
        }
        self.order.push(key.clone());
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Get the handler registered under `key`.
    pub fn lookup(&self, key: &K) -> Result<HandlerRef<K, C>, MachineError> {
        self.handlers
            .get(key)
            .cloned()
            .ok_or_else(|| MachineError::unknown(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.handlers.contains_key(key)
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: StateKey, C: 'static> Default for StateRegistry<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HookState;

    fn handler() -> HandlerRef<&'static str> {
        Rc::new(HookState::<&'static str>::new())
    }

    #[test]
    fn lookup_returns_registered_handler() {
        let mut registry = StateRegistry::new();
        let idle = handler();
        registry.register("idle", Rc::clone(&idle)).unwrap();

        let found = registry.lookup(&"idle").unwrap();
        assert!(Rc::ptr_eq(&found, &idle));
    }

    #[test]
    fn duplicate_keeps_original() {
        let mut registry = StateRegistry::new();
        let original = handler();
        registry.register("idle", Rc::clone(&original)).unwrap();

        let result = registry.register("idle", handler());
        assert_eq!(
            result,
            Err(MachineError::DuplicateState {
                key: "idle".to_string()
            })
        );
        assert!(Rc::ptr_eq(&registry.lookup(&"idle").unwrap(), &original));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_key_is_unknown() {
        let registry: StateRegistry<&'static str> = StateRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.lookup(&"jump"),
            Err(MachineError::UnknownState { key }) if key == "jump"
        ));
    }

    #[test]
    fn keys_keep_registration_order() {
        let mut registry = StateRegistry::new();
        for key in ["run", "idle", "jump"] {
            registry.register(key, handler()).unwrap();
        }

        let keys: Vec<_> = registry.keys().copied().collect();
        assert_eq!(keys, vec!["run", "idle", "jump"]);
        assert!(registry.contains(&"idle"));
        assert!(!registry.contains(&"fall"));
    }
}
