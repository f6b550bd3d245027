//! Builder for constructing state machines.

use crate::core::{StateHandler, StateKey, TransitionGuard};
use crate::machine::{MachineConfig, MachineError, StateMachine};

type Listener<K> = Box<dyn Fn(&K, &K)>;

/// Builder for constructing state machines with a fluent API.
///
/// States are registered in the order they were added. If an initial key is
/// given, `build` also starts the machine.
///
/// # Example
///
/// ```rust
/// use stance::builder::StateMachineBuilder;
/// use stance::core::HookState;
/// use stance::state_key;
///
/// state_key! {
///     enum Door { Open, Closed }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .label("door")
///     .state(Door::Open, HookState::new())
///     .state(Door::Closed, HookState::new())
///     .initial(Door::Closed)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_key().unwrap(), Door::Closed);
/// ```
pub struct StateMachineBuilder<K: StateKey, C: 'static = ()> {
    context: C,
    config: MachineConfig,
    states: Vec<(K, Box<dyn StateHandler<K, C>>)>,
    guard: Option<TransitionGuard<K>>,
    listeners: Vec<Listener<K>>,
    initial: Option<K>,
}

impl<K: StateKey> StateMachineBuilder<K, ()> {
    /// Create a builder for a machine without a context.
    pub fn new() -> Self {
        Self::with_context(())
    }
}

impl<K: StateKey> Default for StateMachineBuilder<K, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey, C: 'static> StateMachineBuilder<K, C> {
    /// Create a builder whose handlers will share `context`.
    pub fn with_context(context: C) -> Self {
        Self {
            context,
            config: MachineConfig::default(),
            states: Vec::new(),
            guard: None,
            listeners: Vec::new(),
            initial: None,
        }
    }

    /// Name reported in log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a state.
    pub fn state<H>(mut self, key: K, handler: H) -> Self
    where
        H: StateHandler<K, C> + 'static,
    {
        self.states.push((key, Box::new(handler)));
        self
    }

    /// Install a guard from a `(current, next)` predicate.
    pub fn guard<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&K, &K) -> bool + 'static,
    {
        self.guard = Some(TransitionGuard::new(predicate));
        self
    }

    /// Subscribe to change notifications.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: Fn(&K, &K) + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Start the built machine in `key`.
    pub fn initial(mut self, key: K) -> Self {
        self.initial = Some(key);
        self
    }

    /// Build the state machine.
    ///
    /// Fails on the first duplicate key, or if the initial key was never added.
    pub fn build(self) -> Result<StateMachine<K, C>, MachineError> {
        let mut machine = StateMachine::with_config(self.context, self.config);

        for (key, handler) in self.states {
            machine.register_boxed(key, handler)?;
        }
        if let Some(guard) = self.guard {
            machine.set_guard(guard);
        }
        for listener in self.listeners {
            machine.subscribe(listener);
        }
        if let Some(initial) = self.initial {
            machine.start(initial)?;
        }

        Ok(machine)
    }
}
