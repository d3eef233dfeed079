//! Core data types of the engine.
//!
//! - States and their closed value union
//! - Operators, events and the rule sets guarding transitions
//!
//! Everything here is plain data plus pure evaluation; mutation lives in
//! the graph and the state machine.

mod rule;
mod state;

pub use rule::{Event, Operator, RuleSet, UnsupportedTag};
pub use state::{State, StateId, StateValue};
