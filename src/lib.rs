//! Rulefsm: a minimal finite-state-machine engine
//!
//! A machine holds a graph of states joined by rule-guarded transitions and
//! a pointer to its current state. Firing an event walks the current state's
//! outgoing transitions in creation order and moves along the first one
//! whose rules accept the event.
//!
//! # Core Concepts
//!
//! - **State**: Graph node with an id and a displayable value
//! - **Transition**: Directed edge carrying an `operator => event` rule set
//! - **StateMachine**: Owns the graph and fires events against it
//! - **Validation**: Whole-graph checks that accumulate every violation
//!
//! # Example
//!
//! ```rust
//! use rulefsm::{rules, StateMachine};
//!
//! let mut machine = StateMachine::init("locked");
//! let locked = machine.initial_state().clone();
//! let unlocked = machine.make_state("unlocked");
//!
//! machine.link_states(&locked, &unlocked, rules! { "eq" => "coin" }).unwrap();
//! machine.link_states(&unlocked, &locked, rules! { "eq" => "push" }).unwrap();
//!
//! machine.fire_event("coin").unwrap();
//! assert_eq!(machine.current_state().render(), "unlocked");
//!
//! // Unmatched events leave the state alone.
//! assert!(machine.fire_event("coin").unwrap().is_stalled());
//!
//! // Unsupported operators are reported, not skipped.
//! let broken = machine.make_state("broken");
//! machine.link_states(&unlocked, &broken, rules! { "gt" => "kick" }).unwrap();
//! assert!(machine.fire_event("kick").is_err());
//! assert_eq!(machine.current_state(), &unlocked);
//! ```

pub mod core;
pub mod engine;
pub mod graph;
mod macros;
pub mod validation;

// Re-export commonly used types
pub use core::{Event, Operator, RuleSet, State, StateId, StateValue};
pub use engine::{
    Computation, EventOutcome, FireError, FireOutcome, MachineConfig, MachineError, StateMachine,
};
pub use graph::{GraphError, Transition, TransitionId};
