//! Record of the transitions a machine has taken.

use crate::core::{Event, StateId};
use crate::graph::TransitionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One taken transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FireRecord {
    /// The transition that was taken
    pub transition: TransitionId,
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// The event that selected the transition
    pub event: Event,
    /// When the transition was taken
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of taken transitions.
///
/// Stalls and failed firings are not recorded. When a limit is set only
/// the most recent records are retained.
///
/// # Example
///
/// ```rust
/// use rulefsm::core::RuleSet;
/// use rulefsm::StateMachine;
///
/// let mut machine = StateMachine::init("locked");
/// let locked = machine.initial_state().clone();
/// let unlocked = machine.make_state("unlocked");
/// machine.link_states(&locked, &unlocked, RuleSet::eq("coin")).unwrap();
///
/// machine.fire_event("coin").unwrap();
///
/// let path = machine.history().get_path();
/// assert_eq!(path, vec![locked.id(), unlocked.id()]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    records: Vec<FireRecord>,
    limit: Option<usize>,
}

impl StateHistory {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            limit: None,
        }
    }

    /// Create a history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Append a record, evicting the oldest ones beyond the limit.
    pub fn record(&mut self, record: FireRecord) {
        self.records.push(record);
        if let Some(limit) = self.limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` of the first retained record, then the `to` of
    /// every record.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Time elapsed between the first and last retained record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[FireRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
