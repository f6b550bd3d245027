//! State key trait for naming and selecting states.
//!
//! Keys are plain values: the machine compares them, hashes them into its
//! registry and clones them into notifications and history records.

use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier for a state registered with a machine.
///
/// # Required Traits
///
/// - `Clone`: keys are copied into notifications and history
/// - `Eq` + `Hash`: keys index the registry and detect self-transitions
/// - `Debug`: keys appear in diagnostics
///
/// Most keys are fieldless enums, which the [`state_key!`](crate::state_key)
/// macro declares in one go.
///
/// # Example
///
/// ```rust
/// use stance::core::StateKey;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Mode {
///     Idle,
///     Attack,
/// }
///
/// impl StateKey for Mode {}
///
/// assert_eq!(Mode::Attack.name(), "Attack");
/// assert_eq!("patrol".name(), "patrol");
/// ```
pub trait StateKey: Clone + Eq + Hash + Debug + 'static {
    /// Get the key's name for display/logging.
    ///
    /// Default implementation uses the `Debug` rendering.
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{:?}", self))
    }
}

impl StateKey for &'static str {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl StateKey for String {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

macro_rules! display_keys {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StateKey for $ty {
                fn name(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

display_keys!(char, bool, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestKey {
        Idle,
        Run,
        Tagged(u8),
    }

    impl StateKey for TestKey {}

    #[test]
    fn default_name_uses_debug() {
        assert_eq!(TestKey::Idle.name(), "Idle");
        assert_eq!(TestKey::Run.name(), "Run");
        assert_eq!(TestKey::Tagged(3).name(), "Tagged(3)");
    }

    #[test]
    fn string_keys_borrow_their_text() {
        let key = String::from("jump");
        assert!(matches!(key.name(), Cow::Borrowed("jump")));
        assert!(matches!("fall".name(), Cow::Borrowed("fall")));
    }

    #[test]
    fn integer_keys_render_as_numbers() {
        assert_eq!(7u32.name(), "7");
        assert_eq!((-2i64).name(), "-2");
        assert_eq!('x'.name(), "x");
    }

    #[test]
    fn key_equality_distinguishes_payloads() {
        assert_eq!(TestKey::Tagged(1), TestKey::Tagged(1));
        assert_ne!(TestKey::Tagged(1), TestKey::Tagged(2));
        assert_ne!(TestKey::Idle, TestKey::Run);
    }
}
