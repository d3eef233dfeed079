//! Append-only directed multigraph of states and transitions.
//!
//! The graph owns every [`State`] and [`Transition`] of one machine together
//! with the id counters used to create them, so separate graphs never share
//! an id space.
//!
//! Outgoing transitions are enumerated in creation order. That order decides
//! which transition wins when several could accept the same event.

mod error;
mod transition;

pub use error::GraphError;
pub use transition::{Transition, TransitionId};

use crate::core::{RuleSet, State, StateId, StateValue};
use tracing::debug;

/// Directed multigraph keyed by state id.
///
/// # Example
///
/// ```rust
/// use rulefsm::core::RuleSet;
/// use rulefsm::graph::TransitionGraph;
///
/// let mut graph = TransitionGraph::new();
/// let locked = graph.add_state("locked");
/// let unlocked = graph.add_state("unlocked");
///
/// graph.add_transition(&locked, &unlocked, RuleSet::eq("coin")).unwrap();
/// graph.add_transition(&locked, &locked, RuleSet::eq("push")).unwrap();
///
/// assert_eq!(graph.outgoing(locked.id()).count(), 2);
/// assert_eq!(graph.between(locked.id(), unlocked.id()).count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionGraph {
    states: Vec<State>,
    transitions: Vec<Transition>,
    // Indexed like `states`; holds indices into `transitions` in creation order.
    outgoing: Vec<Vec<usize>>,
    next_transition_id: u64,
}

impl Default for TransitionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionGraph {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            outgoing: Vec::new(),
            next_transition_id: 1,
        }
    }

    /// Create a state with the next unused id and register it as a node.
    pub fn add_state(&mut self, value: impl Into<StateValue>) -> State {
        let id = StateId(self.states.len() as u64);
        let state = State::new(id, value.into());
        debug!(state.id = %id, state.value = %state.render(), "Added state");

        self.states.push(state.clone());
        self.outgoing.push(Vec::new());
        state
    }

    /// Create a transition `from -> to` guarded by `rules`.
    ///
    /// Both endpoints must be nodes of this graph and the rule set must not
    /// be empty. On error the graph is left untouched.
    pub fn add_transition(
        &mut self,
        from: &State,
        to: &State,
        rules: RuleSet,
    ) -> Result<TransitionId, GraphError> {
        let from_index = self.index_of(from.id())?;
        self.index_of(to.id())?;

        if rules.is_empty() {
            return Err(GraphError::EmptyRules {
                from: from.id(),
                to: to.id(),
            });
        }

        let id = TransitionId(self.next_transition_id);
        self.next_transition_id += 1;
        debug!(
            transition.id = %id,
            from = %from.id(),
            to = %to.id(),
            rules = rules.len(),
            "Linked states"
        );

        self.outgoing[from_index].push(self.transitions.len());
        self.transitions
            .push(Transition::new(id, from.id(), to.id(), rules));
        Ok(id)
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        usize::try_from(id.0).ok().and_then(|i| self.states.get(i))
    }

    pub fn contains_state(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.transitions.get(index)
    }

    /// All states in creation order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// All transitions in creation order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Transitions leaving `id`, in creation order. Empty for unknown ids.
    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        let indices: &[usize] = usize::try_from(id.0)
            .ok()
            .and_then(|i| self.outgoing.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default();
        indices.iter().map(move |&i| &self.transitions[i])
    }

    /// Parallel transitions joining `from` to `to`, in creation order.
    pub fn between(&self, from: StateId, to: StateId) -> impl Iterator<Item = &Transition> {
        self.outgoing(from).filter(move |t| t.to() == to)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    fn index_of(&self, id: StateId) -> Result<usize, GraphError> {
        usize::try_from(id.0)
            .ok()
            .filter(|&i| i < self.states.len())
            .ok_or(GraphError::UnknownState { id })
    }
}
