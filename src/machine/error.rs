//! Machine error types.

use crate::core::StateKey;
use thiserror::Error;

/// Errors that can occur when registering states or driving a machine.
///
/// A vetoed transition or a request for the current key is not an error;
/// those return `Ok(())` without touching any hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// A handler is already registered under this key
    #[error("State '{key}' is already registered")]
    DuplicateState { key: String },

    /// No handler is registered under this key
    #[error("State '{key}' is not registered")]
    UnknownState { key: String },

    /// `start` was called while a state is active
    #[error("State machine already started in state '{current}'")]
    AlreadyStarted { current: String },

    /// The machine has no active state
    #[error("State machine has not been started")]
    NotStarted,

    /// The machine behind a handle has been dropped
    #[error("State machine is no longer alive")]
    Detached,
}

impl MachineError {
    pub(crate) fn duplicate<K: StateKey>(key: &K) -> Self {
        Self::DuplicateState {
            key: key.name().into_owned(),
        }
    }

    pub(crate) fn unknown<K: StateKey>(key: &K) -> Self {
        Self::UnknownState {
            key: key.name().into_owned(),
        }
    }

    pub(crate) fn already_started<K: StateKey>(current: &K) -> Self {
        Self::AlreadyStarted {
            current: current.name().into_owned(),
        }
    }
}
