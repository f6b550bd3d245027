//! Core state machine vocabulary.
//!
//! This module contains the types the engine is generic over:
//! - State keys via the `StateKey` trait
//! - Handlers via the `StateHandler` trait and their `StateBinding`
//! - Guard predicates that veto transitions
//! - Bounded transition history

mod guard;
mod handler;
mod history;
mod key;

pub use guard::TransitionGuard;
pub use handler::{AsAny, HookState, StateBinding, StateHandler};
pub use history::{TransitionHistory, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use key::StateKey;
