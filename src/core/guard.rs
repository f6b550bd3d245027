//! Guard predicates for vetoing state transitions.
//!
//! A guard is consulted before every transition with the current and the
//! requested key. Returning `false` turns the request into a silent no-op.

use super::key::StateKey;
use std::fmt;
use std::rc::Rc;

/// Predicate that decides whether a transition may execute.
///
/// Guards are cheap to clone; the machine clones the installed guard before
/// calling it so the predicate can run without holding any internal borrow.
///
/// # Example
///
/// ```rust
/// use stance::core::TransitionGuard;
/// use stance::state_key;
///
/// state_key! {
///     enum Move { Idle, Run, Jump }
/// }
///
/// // Jumping is only allowed from the ground.
/// let guard = TransitionGuard::new(|from: &Move, to: &Move| {
///     *to != Move::Jump || *from == Move::Idle
/// });
///
/// assert!(guard.check(&Move::Idle, &Move::Jump));
/// assert!(!guard.check(&Move::Run, &Move::Jump));
/// assert!(guard.check(&Move::Run, &Move::Idle));
/// ```
pub struct TransitionGuard<K: StateKey> {
    predicate: Rc<dyn Fn(&K, &K) -> bool>,
}

impl<K: StateKey> TransitionGuard<K> {
    /// Create a guard from a predicate over `(current, next)`.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&K, &K) -> bool + 'static,
    {
        TransitionGuard {
            predicate: Rc::new(predicate),
        }
    }

    /// Guard that rejects every transition into `target`.
    pub fn deny_into(target: K) -> Self {
        Self::new(move |_, next| *next != target)
    }

    /// Guard that rejects the single edge `from -> to`.
    pub fn deny_edge(from: K, to: K) -> Self {
        Self::new(move |current, next| !(*current == from && *next == to))
    }

    /// Check if the guard allows moving from `current` to `next`.
    pub fn check(&self, current: &K, next: &K) -> bool {
        (self.predicate)(current, next)
    }
}

impl<K: StateKey> Clone for TransitionGuard<K> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<K: StateKey> fmt::Debug for TransitionGuard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestKey {
        Idle,
        Run,
        Jump,
    }

    impl StateKey for TestKey {}

    #[test]
    fn guard_sees_both_keys() {
        let guard = TransitionGuard::new(|from: &TestKey, to: &TestKey| {
            matches!((from, to), (TestKey::Idle, TestKey::Run))
        });

        assert!(guard.check(&TestKey::Idle, &TestKey::Run));
        assert!(!guard.check(&TestKey::Run, &TestKey::Idle));
    }

    #[test]
    fn deny_into_blocks_only_the_target() {
        let guard = TransitionGuard::deny_into(TestKey::Jump);

        assert!(!guard.check(&TestKey::Idle, &TestKey::Jump));
        assert!(!guard.check(&TestKey::Run, &TestKey::Jump));
        assert!(guard.check(&TestKey::Jump, &TestKey::Idle));
    }

    #[test]
    fn deny_edge_blocks_one_direction() {
        let guard = TransitionGuard::deny_edge(TestKey::Run, TestKey::Jump);

        assert!(!guard.check(&TestKey::Run, &TestKey::Jump));
        assert!(guard.check(&TestKey::Idle, &TestKey::Jump));
        assert!(guard.check(&TestKey::Jump, &TestKey::Run));
    }

    #[test]
    fn clones_share_the_predicate() {
        let guard = TransitionGuard::deny_into(TestKey::Run);
        let cloned = guard.clone();

        assert_eq!(
            guard.check(&TestKey::Idle, &TestKey::Run),
            cloned.check(&TestKey::Idle, &TestKey::Run)
        );
    }
}
