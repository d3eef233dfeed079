//! Errors raised while driving a state machine.

use crate::core::Operator;
use crate::graph::{GraphError, TransitionId};
use thiserror::Error;

/// Errors that can occur when firing an event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FireError {
    #[error("Comparison operator '{operator}' of transition {transition} is not supported")]
    UnsupportedOperator {
        operator: Operator,
        transition: TransitionId,
    },
}

/// Any error surfaced by the state machine.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Fire(#[from] FireError),

    #[error("Failed to echo state: {0}")]
    Echo(#[from] std::io::Error),
}
