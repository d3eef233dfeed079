//! The state machine and everything that drives it.
//!
//! - [`StateMachine`]: owns the graph and the current-state pointer
//! - [`FireOutcome`] / [`FireError`]: result of firing one event
//! - [`Computation`]: per-event log of a batch run
//! - [`StateHistory`]: record of taken transitions

mod compute;
mod config;
mod error;
mod history;
mod machine;

pub use compute::{Computation, EventOutcome};
pub use config::MachineConfig;
pub use error::{FireError, MachineError};
pub use history::{FireRecord, StateHistory};
pub use machine::{FireOutcome, StateMachine};
