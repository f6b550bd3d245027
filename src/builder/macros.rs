//! Macros for ergonomic state key declaration.

/// Declare a fieldless enum usable as a state key.
///
/// Derives `Clone, Copy, PartialEq, Eq, Hash, Debug`, implements
/// [`StateKey`](crate::core::StateKey) with the variant name as `name()`, and
/// adds an `ALL` constant listing the variants in declaration order.
///
/// # Example
///
/// ```
/// use stance::core::StateKey;
/// use stance::state_key;
///
/// state_key! {
///     pub enum EnemyState {
///         Idle,
///         Patrol,
///         Attack,
///     }
/// }
///
/// assert_eq!(EnemyState::Patrol.name(), "Patrol");
/// assert_eq!(EnemyState::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_key {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            $vis const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::StateKey for $name {
            fn name(&self) -> ::std::borrow::Cow<'_, str> {
                match *self {
                    $(Self::$variant => ::std::borrow::Cow::Borrowed(stringify!($variant))),*
                }
            }
        }
    };
}
