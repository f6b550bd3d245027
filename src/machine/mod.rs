//! The state machine engine.
//!
//! This module holds the stateful part of the crate:
//! - `StateRegistry`: append-only key to handler mapping
//! - `StateMachine`: registration, start, transitions and clear
//! - `MachineHandle`: the weak back-reference handed to handlers
//! - `MachineError`: every failure the engine reports
//!
//! The engine never schedules anything. Time-driven behavior belongs to the
//! handlers, which ask for transitions through their handle.

mod config;
mod engine;
mod error;
mod observer;
mod registry;

pub use config::MachineConfig;
pub use engine::{MachineHandle, StateMachine};
pub use error::MachineError;
pub use observer::SubscriptionId;
pub use registry::{HandlerRef, StateRegistry};
