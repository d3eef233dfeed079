//! Per-event results of a batch computation.

use crate::core::{Event, State};
use crate::engine::error::FireError;
use crate::engine::machine::FireOutcome;

/// Result of one event within a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct EventOutcome {
    pub event: Event,
    pub result: Result<FireOutcome, FireError>,
    /// Current state once the event was processed
    pub state: State,
}

/// Outcome log of [`StateMachine::compute`](crate::StateMachine::compute).
#[derive(Clone, Debug, PartialEq)]
pub struct Computation {
    outcomes: Vec<EventOutcome>,
    final_state: State,
}

impl Computation {
    pub(crate) fn new(outcomes: Vec<EventOutcome>, final_state: State) -> Self {
        Self {
            outcomes,
            final_state,
        }
    }

    pub fn final_state(&self) -> &State {
        &self.final_state
    }

    pub fn into_final_state(self) -> State {
        self.final_state
    }

    /// One entry per event, in firing order.
    pub fn outcomes(&self) -> &[EventOutcome] {
        &self.outcomes
    }

    pub fn errors(&self) -> impl Iterator<Item = &FireError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Rendering of the current state after each event.
    pub fn rendered(&self) -> Vec<String> {
        self.outcomes.iter().map(|o| o.state.render()).collect()
    }

    pub fn transitioned(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.result, Ok(outcome) if outcome.is_transitioned()))
            .count()
    }
}
