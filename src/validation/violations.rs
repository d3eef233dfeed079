//! Violations reported by graph validation.

use crate::core::{Event, Operator, StateId};
use crate::graph::TransitionId;
use thiserror::Error;

/// Problems found in a machine's transition graph
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphViolation {
    #[error("Transition {transition} uses unsupported operator '{operator}'")]
    UnsupportedOperator {
        transition: TransitionId,
        operator: Operator,
    },

    #[error("Transition {shadowed} from state {state} never wins '{event}': transition {by} is tried first")]
    ShadowedTransition {
        state: StateId,
        event: Event,
        shadowed: TransitionId,
        by: TransitionId,
    },

    #[error("State {state} is not reachable from the initial state")]
    UnreachableState { state: StateId },
}
