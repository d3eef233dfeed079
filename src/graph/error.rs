//! Errors raised while building the transition graph.

use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur when adding transitions to a graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("State {id} is not a node of this graph")]
    UnknownState { id: StateId },

    #[error("Transition {from} -> {to} has no rules and could never fire")]
    EmptyRules { from: StateId, to: StateId },
}
