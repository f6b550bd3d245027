//! State handler contract and the binding handed to each handler.
//!
//! A handler is the behavior bound to one key. The machine owns it once
//! registered and calls `on_enter`/`on_exit` exactly once per activation and
//! deactivation. Hooks take `&self` so a handler can request further
//! transitions through its binding while one of its own hooks is running;
//! handlers that track per-activation data keep it in `Cell`/`RefCell` fields.

use super::key::StateKey;
use crate::machine::{MachineError, MachineHandle};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Access to a handler as `Any`, for downcasting to its concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Behavior bound to a single state key.
///
/// `K` is the machine's key type and `C` the shared context type (`()` for
/// machines without a context).
///
/// # Example
///
/// ```rust
/// use stance::core::{StateBinding, StateHandler};
/// use std::cell::Cell;
///
/// #[derive(Default)]
/// struct Idle {
///     entered: Cell<u32>,
///     binding: Option<StateBinding<&'static str>>,
/// }
///
/// impl StateHandler<&'static str> for Idle {
///     fn bind(&mut self, binding: StateBinding<&'static str>) {
///         self.binding = Some(binding);
///     }
///
///     fn on_enter(&self) {
///         self.entered.set(self.entered.get() + 1);
///     }
///
///     fn on_exit(&self) {}
/// }
/// ```
pub trait StateHandler<K: StateKey, C: 'static = ()>: AsAny {
    /// Receive the machine back-reference and shared context.
    ///
    /// Called once, at registration, before the first `on_enter`.
    fn bind(&mut self, binding: StateBinding<K, C>) {
        let _ = binding;
    }

    /// Set up everything this activation needs.
    fn on_enter(&self);

    /// Release or cancel anything started in `on_enter`.
    fn on_exit(&self);
}

impl<K: StateKey, C: 'static> dyn StateHandler<K, C> {
    /// Downcast to the concrete handler type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// What a handler receives at registration: a non-owning handle to its
/// machine and the machine's shared context.
pub struct StateBinding<K: StateKey, C: 'static = ()> {
    machine: MachineHandle<K, C>,
    context: Rc<C>,
}

impl<K: StateKey, C: 'static> StateBinding<K, C> {
    pub(crate) fn new(machine: MachineHandle<K, C>, context: Rc<C>) -> Self {
        Self { machine, context }
    }

    /// Handle used to request transitions.
    pub fn machine(&self) -> &MachineHandle<K, C> {
        &self.machine
    }

    /// The owner-supplied context shared by every handler of this machine.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Shorthand for `self.machine().change_state(next)`.
    pub fn change_state(&self, next: K) -> Result<(), MachineError> {
        self.machine.change_state(next)
    }
}

impl<K: StateKey, C: 'static> Clone for StateBinding<K, C> {
    fn clone(&self) -> Self {
        Self {
            machine: self.machine.clone(),
            context: Rc::clone(&self.context),
        }
    }
}

impl<K: StateKey, C: 'static> fmt::Debug for StateBinding<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBinding")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

type Hook<K, C> = Box<dyn Fn(&StateBinding<K, C>)>;

/// Handler assembled from closures, for states with no data of their own.
///
/// Hooks run only once the handler has been bound to a machine.
///
/// # Example
///
/// ```rust
/// use stance::core::HookState;
/// use stance::StateMachine;
///
/// let mut machine = StateMachine::new();
/// machine
///     .register("boot", HookState::new().enter_with(|binding| {
///         let _ = binding.change_state("ready");
///     }))
///     .unwrap();
/// machine.register("ready", HookState::new()).unwrap();
///
/// machine.start("boot").unwrap();
/// assert_eq!(machine.current_key().unwrap(), "ready");
/// ```
pub struct HookState<K: StateKey, C: 'static = ()> {
    binding: Option<StateBinding<K, C>>,
    enter: Option<Hook<K, C>>,
    exit: Option<Hook<K, C>>,
}

impl<K: StateKey, C: 'static> HookState<K, C> {
    pub fn new() -> Self {
        Self {
            binding: None,
            enter: None,
            exit: None,
        }
    }

    /// Set the enter hook.
    pub fn enter_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StateBinding<K, C>) + 'static,
    {
        self.enter = Some(Box::new(hook));
        self
    }

    /// Set the exit hook.
    pub fn exit_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StateBinding<K, C>) + 'static,
    {
        self.exit = Some(Box::new(hook));
        self
    }

    fn run(&self, hook: &Option<Hook<K, C>>) {
        if let (Some(binding), Some(hook)) = (&self.binding, hook) {
            hook(binding);
        }
    }
}

impl<K: StateKey, C: 'static> Default for HookState<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey, C: 'static> StateHandler<K, C> for HookState<K, C> {
    fn bind(&mut self, binding: StateBinding<K, C>) {
        self.binding = Some(binding);
    }

    fn on_enter(&self) {
        self.run(&self.enter);
    }

    fn on_exit(&self) {
        self.run(&self.exit);
    }
}
