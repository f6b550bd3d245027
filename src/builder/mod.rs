//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder and a key-declaration macro for
//! assembling machines with minimal boilerplate.

pub mod machine;
pub mod macros;

pub use machine::StateMachineBuilder;

use crate::core::{HookState, StateKey};

/// Create a handler whose `on_enter` immediately requests `next`.
///
/// Useful for transient states such as a one-frame "landed" state.
///
/// # Example
///
/// ```
/// use stance::builder::{pass_through, StateMachineBuilder};
/// use stance::core::HookState;
///
/// let machine = StateMachineBuilder::new()
///     .state("landed", pass_through("idle"))
///     .state("idle", HookState::new())
///     .initial("landed")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_key().unwrap(), "idle");
/// ```
pub fn pass_through<K, C>(next: K) -> HookState<K, C>
where
    K: StateKey,
    C: 'static,
{
    HookState::new().enter_with(move |binding| {
        if let Err(err) = binding.change_state(next.clone()) {
            tracing::warn!(to = %next.name(), error = %err, "pass-through transition failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MachineError;

    #[test]
    fn pass_through_chains_to_target() {
        let machine = StateMachineBuilder::new()
            .state(1u8, pass_through(2u8))
            .state(2u8, pass_through(3u8))
            .state(3u8, HookState::new())
            .initial(1)
            .build()
            .unwrap();

        assert_eq!(machine.current_key(), Ok(3));
        assert_eq!(machine.history().path(), vec![&1, &2, &3]);
    }

    #[test]
    fn pass_through_to_unknown_stays_put() {
        let machine = StateMachineBuilder::new()
            .state(1u8, pass_through(9u8))
            .initial(1)
            .build()
            .unwrap();

        assert_eq!(machine.current_key(), Ok(1));
        assert_eq!(machine.change_state(9), Err(MachineError::UnknownState { key: "9".into() }));
    }
}
