//! Stance: a keyed finite-state-machine container
//!
//! Stance structures an entity's behavior as a single active state drawn from
//! a fixed set. The owner registers one handler per key, starts the machine,
//! and from then on requests transitions; the machine validates each request
//! and runs it in a fixed order: exit, swap, enter, notify.
//!
//! The machine owns no notion of time. A host keeps its own update loop and
//! drives per-frame or timed behavior inside handlers, which ask for the next
//! state through the back-reference they receive at registration.
//!
//! # Core Concepts
//!
//! - **Keys**: any `Clone + Eq + Hash + Debug` value via the `StateKey` trait
//! - **Handlers**: `on_enter`/`on_exit` behavior via the `StateHandler` trait
//! - **Guards**: predicates over `(current, next)` that can veto a transition
//! - **Context**: one owner-supplied value shared by every handler
//!
//! # Example
//!
//! ```rust
//! use stance::core::{StateBinding, StateHandler};
//! use stance::{state_key, StateMachine};
//! use std::cell::Cell;
//!
//! state_key! {
//!     enum Mode { Idle, Attack }
//! }
//!
//! struct Enemy {
//!     hits: Cell<u32>,
//! }
//!
//! #[derive(Default)]
//! struct Attack {
//!     binding: Option<StateBinding<Mode, Enemy>>,
//! }
//!
//! impl StateHandler<Mode, Enemy> for Attack {
//!     fn bind(&mut self, binding: StateBinding<Mode, Enemy>) {
//!         self.binding = Some(binding);
//!     }
//!
//!     fn on_enter(&self) {
//!         if let Some(binding) = &self.binding {
//!             let hits = &binding.context().hits;
//!             hits.set(hits.get() + 1);
//!         }
//!     }
//!
//!     fn on_exit(&self) {}
//! }
//!
//! let mut machine = StateMachine::with_context(Enemy { hits: Cell::new(0) });
//! machine.register(Mode::Idle, stance::core::HookState::new()).unwrap();
//! machine.register(Mode::Attack, Attack::default()).unwrap();
//!
//! machine.start(Mode::Idle).unwrap();
//! machine.change_state(Mode::Attack).unwrap();
//! machine.change_state(Mode::Idle).unwrap();
//! machine.change_state(Mode::Attack).unwrap();
//!
//! assert_eq!(machine.context().hits.get(), 2);
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::StateMachineBuilder;
pub use crate::core::{StateBinding, StateHandler, StateKey, TransitionGuard};
pub use crate::machine::{MachineError, MachineHandle, StateMachine};
