//! Keyed state machine engine.
//!
//! The engine owns every registered handler and a pointer to the active one.
//! A transition runs strictly in the order exit, swap, enter, notify. Hooks
//! may call back into the machine through their [`MachineHandle`]; a request
//! made from `on_enter` (or from a change subscriber) runs to completion on
//! the spot, while a request made from `on_exit` or from the guard is queued
//! until the transition that triggered it has finished or been vetoed.

use super::config::MachineConfig;
use super::error::MachineError;
use super::observer::{Observers, SubscriptionId};
use super::registry::{HandlerRef, StateRegistry};
use crate::core::{
    StateBinding, StateHandler, StateKey, TransitionGuard, TransitionHistory, TransitionRecord,
};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// The active registry entry.
struct Active<K: StateKey, C: 'static> {
    key: K,
    handler: HandlerRef<K, C>,
}

impl<K: StateKey, C: 'static> Clone for Active<K, C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            handler: Rc::clone(&self.handler),
        }
    }
}

/// Which hook, if any, the machine is currently unwinding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Running the guard for a pending transition
    Guarding,
    /// Running the outgoing state's `on_exit` during a transition
    Exiting,
    /// Running the active state's `on_exit` during `clear`
    Stopping,
}

/// State shared between the owning machine and every handle.
///
/// Each field has its own cell and no borrow is held while a hook, guard or
/// subscriber runs, so all of them may re-enter.
struct Shared<K: StateKey, C: 'static> {
    label: Option<String>,
    context: Rc<C>,
    registry: RefCell<StateRegistry<K, C>>,
    current: RefCell<Option<Active<K, C>>>,
    guard: RefCell<Option<TransitionGuard<K>>>,
    observers: RefCell<Observers<K>>,
    history: RefCell<TransitionHistory<K>>,
    phase: Cell<Phase>,
    deferred: RefCell<VecDeque<K>>,
}

impl<K: StateKey, C: 'static> Shared<K, C> {
    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }

    fn active(&self) -> Result<Active<K, C>, MachineError> {
        self.current.borrow().clone().ok_or(MachineError::NotStarted)
    }

    fn current_key(&self) -> Result<K, MachineError> {
        self.current
            .borrow()
            .as_ref()
            .map(|active| active.key.clone())
            .ok_or(MachineError::NotStarted)
    }

    fn start(&self, key: K) -> Result<(), MachineError> {
        if let Some(active) = self.current.borrow().as_ref() {
            return Err(MachineError::already_started(&active.key));
        }

        let handler = self.registry.borrow().lookup(&key)?;
        *self.current.borrow_mut() = Some(Active {
            key: key.clone(),
            handler: Rc::clone(&handler),
        });

        tracing::debug!(machine = %self.label(), state = %key.name(), "state machine started");
        handler.on_enter();
        Ok(())
    }

    fn change_state(&self, next: K) -> Result<(), MachineError> {
        let previous = self.active()?;

        match self.phase.get() {
            Phase::Stopping => return Err(MachineError::NotStarted),
            phase @ (Phase::Guarding | Phase::Exiting) => {
                if !self.registry.borrow().contains(&next) {
                    return Err(MachineError::unknown(&next));
                }
                tracing::trace!(
                    machine = %self.label(),
                    to = %next.name(),
                    ?phase,
                    "transition requested mid-transition, deferring"
                );
                self.deferred.borrow_mut().push_back(next);
                return Ok(());
            }
            Phase::Idle => {}
        }

        if next == previous.key {
            tracing::trace!(machine = %self.label(), state = %next.name(), "self-transition ignored");
            return Ok(());
        }

        let guard = self.guard.borrow().clone();
        if let Some(guard) = guard {
            let phase = self.phase.replace(Phase::Guarding);
            let allowed = guard.check(&previous.key, &next);
            self.phase.set(phase);
            if !allowed {
                tracing::trace!(
                    machine = %self.label(),
                    from = %previous.key.name(),
                    to = %next.name(),
                    "transition vetoed by guard"
                );
                self.apply_deferred();
                return Ok(());
            }
        }

        let lookup = self.registry.borrow().lookup(&next);
        let handler = match lookup {
            Ok(handler) => handler,
            Err(err) => {
                self.apply_deferred();
                return Err(err);
            }
        };

        let phase = self.phase.replace(Phase::Exiting);
        previous.handler.on_exit();
        self.phase.set(phase);
        let deferred = std::mem::take(&mut *self.deferred.borrow_mut());

        *self.current.borrow_mut() = Some(Active {
            key: next.clone(),
            handler: Rc::clone(&handler),
        });
        self.history.borrow_mut().record(TransitionRecord {
            from: previous.key.clone(),
            to: next.clone(),
            timestamp: Utc::now(),
        });
        tracing::debug!(
            machine = %self.label(),
            from = %previous.key.name(),
            to = %next.name(),
            "state changed"
        );

        handler.on_enter();

        let listeners = self.observers.borrow().snapshot();
        for listener in listeners {
            listener(&previous.key, &next);
        }

        self.run_deferred(deferred);
        Ok(())
    }

    fn apply_deferred(&self) {
        let deferred = std::mem::take(&mut *self.deferred.borrow_mut());
        self.run_deferred(deferred);
    }

    /// Apply requests queued while a guard or `on_exit` was running.
    ///
    /// Every key was checked against the registry when it was queued, the
    /// registry never shrinks, and stopping the machine needs `&mut`, so
    /// none of these can fail while the machine is alive.
    fn run_deferred(&self, deferred: VecDeque<K>) {
        for key in deferred {
            let result = self.change_state(key.clone());
            debug_assert!(result.is_ok(), "deferred transition failed: {:?}", result);
            if let Err(err) = result {
                tracing::warn!(
                    machine = %self.label(),
                    to = %key.name(),
                    error = %err,
                    "deferred transition failed"
                );
            }
        }
    }

    fn clear(&self) -> Result<(), MachineError> {
        let active = self.active()?;

        let phase = self.phase.replace(Phase::Stopping);
        active.handler.on_exit();
        self.phase.set(phase);

        *self.current.borrow_mut() = None;
        tracing::debug!(machine = %self.label(), state = %active.key.name(), "state machine cleared");
        Ok(())
    }
}

/// Non-owning back-reference to a [`StateMachine`].
///
/// Handed to every handler through its [`StateBinding`]. It can request
/// transitions and read the current key, nothing else. Once the machine is
/// dropped every call fails with [`MachineError::Detached`].
pub struct MachineHandle<K: StateKey, C: 'static = ()> {
    shared: Weak<Shared<K, C>>,
}

impl<K: StateKey, C: 'static> MachineHandle<K, C> {
    fn upgrade(&self) -> Result<Rc<Shared<K, C>>, MachineError> {
        self.shared.upgrade().ok_or(MachineError::Detached)
    }

    /// Request a transition to `next`.
    ///
    /// Same semantics as [`StateMachine::change_state`].
    pub fn change_state(&self, next: K) -> Result<(), MachineError> {
        self.upgrade()?.change_state(next)
    }

    pub fn current_key(&self) -> Result<K, MachineError> {
        self.upgrade()?.current_key()
    }

    pub fn is_started(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.current_key().is_ok())
    }

    /// Whether the machine behind this handle still exists.
    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl<K: StateKey, C: 'static> Clone for MachineHandle<K, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<K: StateKey, C: 'static> fmt::Debug for MachineHandle<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Finite state machine over keys `K` with an optional shared context `C`.
///
/// The machine is single-threaded (`!Send`); hooks, guards and subscribers
/// run synchronously on the caller's thread.
///
/// # Example
///
/// ```rust
/// use stance::core::HookState;
/// use stance::{state_key, StateMachine, TransitionGuard};
///
/// state_key! {
///     enum Mode { Idle, Patrol, Attack }
/// }
///
/// let mut machine = StateMachine::new();
/// for mode in Mode::ALL {
///     machine.register(*mode, HookState::new()).unwrap();
/// }
/// machine.set_guard(TransitionGuard::deny_edge(Mode::Idle, Mode::Attack));
///
/// machine.start(Mode::Idle).unwrap();
/// machine.change_state(Mode::Attack).unwrap();
/// assert_eq!(machine.current_key().unwrap(), Mode::Idle);
///
/// machine.change_state(Mode::Patrol).unwrap();
/// machine.change_state(Mode::Attack).unwrap();
/// assert_eq!(machine.current_key().unwrap(), Mode::Attack);
/// ```
pub struct StateMachine<K: StateKey, C: 'static = ()> {
    shared: Rc<Shared<K, C>>,
}

impl<K: StateKey> StateMachine<K, ()> {
    /// Create a machine without a context.
    pub fn new() -> Self {
        Self::with_context(())
    }
}

impl<K: StateKey> Default for StateMachine<K, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey, C: 'static> StateMachine<K, C> {
    /// Create a machine whose handlers all share `context`.
    pub fn with_context(context: C) -> Self {
        Self::with_config(context, MachineConfig::default())
    }

    pub fn with_config(context: C, config: MachineConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                label: config.label,
                context: Rc::new(context),
                registry: RefCell::new(StateRegistry::new()),
                current: RefCell::new(None),
                guard: RefCell::new(None),
                observers: RefCell::new(Observers::new()),
                history: RefCell::new(TransitionHistory::with_capacity(config.history_capacity)),
                phase: Cell::new(Phase::Idle),
                deferred: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Register `handler` under `key`.
    ///
    /// The handler is bound to this machine before it is stored. Fails with
    /// `DuplicateState` if the key is taken, leaving the original in place.
    pub fn register<H>(&mut self, key: K, handler: H) -> Result<(), MachineError>
    where
        H: StateHandler<K, C> + 'static,
    {
        self.register_boxed(key, Box::new(handler))
    }

    pub fn register_boxed(
        &mut self,
        key: K,
        mut handler: Box<dyn StateHandler<K, C>>,
    ) -> Result<(), MachineError> {
        if self.shared.registry.borrow().contains(&key) {
            return Err(MachineError::duplicate(&key));
        }

        handler.bind(StateBinding::new(self.handle(), Rc::clone(&self.shared.context)));
        tracing::trace!(machine = %self.shared.label(), state = %key.name(), "state registered");
        self.shared
            .registry
            .borrow_mut()
            .register(key, Rc::from(handler))
    }

    /// Activate `key` and run its `on_enter`.
    ///
    /// Allowed only while no state is active. No change notification fires.
    pub fn start(&mut self, key: K) -> Result<(), MachineError> {
        self.shared.start(key)
    }

    /// Move to `next`: exit the current state, swap, enter `next`, notify.
    ///
    /// Requests for the current key and requests vetoed by the guard are
    /// ignored. An unknown key fails without touching the current state.
    pub fn change_state(&self, next: K) -> Result<(), MachineError> {
        self.shared.change_state(next)
    }

    /// Exit the current state and leave the machine stopped.
    ///
    /// Registered states are kept; the machine can be started again.
    pub fn clear(&mut self) -> Result<(), MachineError> {
        self.shared.clear()
    }

    pub fn current_key(&self) -> Result<K, MachineError> {
        self.shared.current_key()
    }

    pub fn current_handler(&self) -> Result<HandlerRef<K, C>, MachineError> {
        self.shared.active().map(|active| active.handler)
    }

    pub fn is_started(&self) -> bool {
        self.shared.current.borrow().is_some()
    }

    /// Install a guard, returning the one it replaces.
    pub fn set_guard(&mut self, guard: TransitionGuard<K>) -> Option<TransitionGuard<K>> {
        self.shared.guard.replace(Some(guard))
    }

    pub fn clear_guard(&mut self) -> Option<TransitionGuard<K>> {
        self.shared.guard.take()
    }

    /// Call `listener` with `(previous, next)` after every completed transition.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&K, &K) + 'static,
    {
        self.shared.observers.borrow_mut().subscribe(Rc::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.shared.observers.borrow_mut().unsubscribe(id)
    }

    /// A new back-reference to this machine.
    pub fn handle(&self) -> MachineHandle<K, C> {
        MachineHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn context(&self) -> &C {
        &self.shared.context
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.shared.registry.borrow().contains(key)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<K> {
        self.shared.registry.borrow().keys().cloned().collect()
    }

    /// Snapshot of the recorded transitions.
    pub fn history(&self) -> TransitionHistory<K> {
        self.shared.history.borrow().clone()
    }

    pub fn clear_history(&mut self) {
        self.shared.history.borrow_mut().clear();
    }
}

impl<K: StateKey, C: 'static> fmt::Debug for StateMachine<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.shared.label())
            .field("current", &self.current_key().ok())
            .field("states", &self.shared.registry.borrow().len())
            .field("subscribers", &self.shared.observers.borrow().len())
            .finish()
    }
}
