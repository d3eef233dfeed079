//! State machine that fires events against the transition graph.

use crate::core::{Event, RuleSet, State, StateId, StateValue};
use crate::engine::compute::{Computation, EventOutcome};
use crate::engine::config::MachineConfig;
use crate::engine::error::{FireError, MachineError};
use crate::engine::history::{FireRecord, StateHistory};
use crate::graph::{GraphError, Transition, TransitionGraph, TransitionId};
use crate::validation::{self, GraphViolation};
use chrono::Utc;
use std::convert::Infallible;
use std::io::Write;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, trace, warn};

/// Result of firing a single event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// A transition accepted the event and the machine moved
    Transitioned {
        transition: TransitionId,
        from: StateId,
        to: StateId,
    },

    /// No outgoing transition accepted the event; the state is unchanged
    Stalled,
}

impl FireOutcome {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    pub fn is_stalled(&self) -> bool {
        matches!(self, Self::Stalled)
    }
}

/// Finite-state machine over an owned transition graph.
///
/// The machine is created with its initial state, so the current state
/// always refers to a node of the graph.
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
///
/// machine.link_states(&locked, &unlocked, RuleSet::eq("coin")).unwrap();
/// machine.link_states(&unlocked, &locked, RuleSet::eq("push")).unwrap();
/// machine.link_states(&locked, &locked, RuleSet::eq("push")).unwrap();
/// machine.link_states(&unlocked, &unlocked, RuleSet::eq("coin")).unwrap();
///
/// let run = machine.compute(["coin", "push"], false);
/// assert_eq!(run.rendered(), vec!["unlocked", "locked"]);
/// assert_eq!(run.final_state(), &locked);
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine {
    graph: TransitionGraph,
    initial: State,
    current: State,
    history: StateHistory,
    config: MachineConfig,
}

impl StateMachine {
    /// Create a machine whose graph holds a single initial state.
    pub fn init(value: impl Into<StateValue>) -> Self {
        Self::with_config(value, MachineConfig::default())
    }

    /// Create a machine with explicit configuration.
    pub fn with_config(value: impl Into<StateValue>, config: MachineConfig) -> Self {
        let mut graph = TransitionGraph::new();
        let initial = graph.add_state(value);
        let history = match config.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        debug!(state.id = %initial.id(), "Initialized state machine");

        Self {
            graph,
            current: initial.clone(),
            initial,
            history,
            config,
        }
    }

    /// Add a state to the graph without making it current.
    pub fn make_state(&mut self, value: impl Into<StateValue>) -> State {
        self.graph.add_state(value)
    }

    /// Link two states of this machine with a rule-guarded transition.
    pub fn link_states(
        &mut self,
        from: &State,
        to: &State,
        rules: RuleSet,
    ) -> Result<TransitionId, GraphError> {
        self.graph.add_transition(from, to, rules)
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &State {
        &self.current
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    /// Point the machine back at its initial state.
    pub fn reset(&mut self) {
        debug!(from = %self.current.id(), to = %self.initial.id(), "Reset state machine");
        self.current = self.initial.clone();
    }

    /// Fire one event against the current state's outgoing transitions.
    ///
    /// Transitions are tried in creation order and the first whose rules
    /// accept the event is taken. An unsupported operator met before any
    /// match aborts firing with an error. If nothing matches the machine
    /// stalls: the state is unchanged and no error is returned.
    pub fn fire_event(&mut self, event: impl Into<Event>) -> Result<FireOutcome, FireError> {
        let event = event.into();

        let Some((transition, next)) = self.select(&event)? else {
            trace!(state = %self.current.id(), %event, "Event matched no transition");
            return Ok(FireOutcome::Stalled);
        };

        let from = self.current.id();
        let to = next.id();
        debug!(%event, transition = %transition, %from, %to, "Transitioned");

        if self.config.record_history {
            self.history.record(FireRecord {
                transition,
                from,
                to,
                event,
                timestamp: Utc::now(),
            });
        }
        self.current = next;

        Ok(FireOutcome::Transitioned {
            transition,
            from,
            to,
        })
    }

    /// Find the transition taken for `event` from the current state (pure).
    fn select(&self, event: &Event) -> Result<Option<(TransitionId, State)>, FireError> {
        for transition in self.graph.outgoing(self.current.id()) {
            match transition.accepts(event) {
                Ok(true) => {
                    return Ok(self
                        .graph
                        .state(transition.to())
                        .map(|next| (transition.id(), next.clone())));
                }
                Ok(false) => {}
                Err(operator) => {
                    warn!(
                        %operator,
                        transition = %transition.id(),
                        %event,
                        "Unsupported comparison operator"
                    );
                    return Err(FireError::UnsupportedOperator {
                        operator: operator.clone(),
                        transition: transition.id(),
                    });
                }
            }
        }
        Ok(None)
    }

    /// Fire a sequence of events in order.
    ///
    /// Every event is processed even after a failure; each result is kept
    /// in the returned [`Computation`]. With `echo`, the current state is
    /// printed to stdout after every event.
    pub fn compute<I>(&mut self, events: I, echo: bool) -> Computation
    where
        I: IntoIterator,
        I::Item: Into<Event>,
    {
        let run = self.run(events, |state| {
            if echo {
                println!("{state}");
            }
            Ok::<(), Infallible>(())
        });
        match run {
            Ok(computation) => computation,
            Err(never) => match never {},
        }
    }

    /// Like [`compute`](Self::compute), echoing every state to `sink`.
    pub fn compute_to<I, W>(&mut self, events: I, sink: &mut W) -> Result<Computation, MachineError>
    where
        I: IntoIterator,
        I::Item: Into<Event>,
        W: Write,
    {
        let computation = self.run(events, |state| writeln!(sink, "{state}"))?;
        Ok(computation)
    }

    fn run<I, F, E>(&mut self, events: I, mut emit: F) -> Result<Computation, E>
    where
        I: IntoIterator,
        I::Item: Into<Event>,
        F: FnMut(&State) -> Result<(), E>,
    {
        let mut outcomes = Vec::new();
        for event in events {
            let event = event.into();
            let result = self.fire_event(event.clone());
            if let Err(err) = &result {
                debug!(%event, error = %err, "Event failed, continuing");
            }
            emit(&self.current)?;
            outcomes.push(EventOutcome {
                event,
                result,
                state: self.current.clone(),
            });
        }
        Ok(Computation::new(outcomes, self.current.clone()))
    }

    /// Events the current state would accept, in evaluation order.
    pub fn triggerable_events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = Vec::new();
        for event in self
            .graph
            .outgoing(self.current.id())
            .flat_map(|t| t.rules().accepted_events())
        {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        events
    }

    /// Check the whole graph, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<GraphViolation>> {
        validation::validate(&self.graph, self.initial.id())
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn graph(&self) -> &TransitionGraph {
        &self.graph
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.graph.state(id)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.graph.transition(id)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.graph.states()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.graph.transitions()
    }

    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.graph.outgoing(id)
    }

    pub fn state_count(&self) -> usize {
        self.graph.state_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.transition_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Turnstile {
        machine: StateMachine,
        locked: State,
        unlocked: State,
    }

    fn turnstile() -> Turnstile {
        let mut machine = StateMachine::init("locked");
        let locked = machine.initial_state().clone();
        let unlocked = machine.make_state("unlocked");

        machine
            .link_states(&locked, &unlocked, RuleSet::eq("coin"))
            .unwrap();
        machine
            .link_states(&unlocked, &locked, RuleSet::eq("push"))
            .unwrap();
        machine
            .link_states(&locked, &locked, RuleSet::eq("push"))
            .unwrap();
        machine
            .link_states(&unlocked, &unlocked, RuleSet::eq("coin"))
            .unwrap();

        Turnstile {
            machine,
            locked,
            unlocked,
        }
    }

    #[test]
    fn init_sets_current_state() {
        let machine = StateMachine::init("start");
        assert_eq!(machine.current_state(), machine.initial_state());
        assert_eq!(machine.current_state().render(), "start");
        assert_eq!(machine.state_count(), 1);
    }

    #[test]
    fn matching_event_moves_to_target() {
        let mut t = turnstile();
        let outcome = t.machine.fire_event("coin").unwrap();

        assert_eq!(
            outcome,
            FireOutcome::Transitioned {
                transition: TransitionId(1),
                from: t.locked.id(),
                to: t.unlocked.id(),
            }
        );
        assert_eq!(t.machine.current_state(), &t.unlocked);
    }

    #[test]
    fn self_loop_keeps_state_as_transition() {
        let mut t = turnstile();
        let outcome = t.machine.fire_event("push").unwrap();

        assert!(outcome.is_transitioned());
        assert_eq!(t.machine.current_state(), &t.locked);
        assert_eq!(t.machine.history().len(), 1);
    }

    #[test]
    fn unmatched_event_stalls() {
        let mut t = turnstile();
        let outcome = t.machine.fire_event("kick").unwrap();

        assert!(outcome.is_stalled());
        assert_eq!(t.machine.current_state(), &t.locked);
        assert!(t.machine.history().is_empty());
    }

    #[test]
    fn unsupported_operator_fails_without_moving() {
        let mut machine = StateMachine::init("locked");
        let locked = machine.initial_state().clone();
        let unlocked = machine.make_state("unlocked");
        let id = machine
            .link_states(&locked, &unlocked, RuleSet::new().with("gt", "coin"))
            .unwrap();

        let err = machine.fire_event("coin").unwrap_err();

        assert_eq!(
            err,
            FireError::UnsupportedOperator {
                operator: "gt".into(),
                transition: id,
            }
        );
        assert_eq!(machine.current_state(), &locked);
    }

    #[test]
    fn unsupported_operator_stops_later_transitions() {
        let mut machine = StateMachine::init("a");
        let a = machine.initial_state().clone();
        let b = machine.make_state("b");
        machine
            .link_states(&a, &b, RuleSet::new().with("lt", "x"))
            .unwrap();
        machine.link_states(&a, &b, RuleSet::eq("x")).unwrap();

        assert!(machine.fire_event("x").is_err());
        assert_eq!(machine.current_state(), &a);
    }

    #[test]
    fn earlier_match_shadows_unsupported_operator() {
        let mut machine = StateMachine::init("a");
        let a = machine.initial_state().clone();
        let b = machine.make_state("b");
        machine.link_states(&a, &b, RuleSet::eq("x")).unwrap();
        machine
            .link_states(&a, &a, RuleSet::new().with("lt", "x"))
            .unwrap();

        assert!(machine.fire_event("x").unwrap().is_transitioned());
        assert_eq!(machine.current_state(), &b);
    }

    #[test]
    fn first_created_transition_wins() {
        let mut machine = StateMachine::init("start");
        let start = machine.initial_state().clone();
        let first = machine.make_state("first");
        let second = machine.make_state("second");
        machine.link_states(&start, &first, RuleSet::eq("go")).unwrap();
        machine.link_states(&start, &second, RuleSet::eq("go")).unwrap();

        machine.fire_event("go").unwrap();
        assert_eq!(machine.current_state(), &first);
    }

    #[test]
    fn rules_are_evaluated_in_insertion_order() {
        let mut machine = StateMachine::init("idle");
        let idle = machine.initial_state().clone();
        let busy = machine.make_state("busy");
        let rules = RuleSet::eq("start").with("gt", "start");
        machine.link_states(&idle, &busy, rules).unwrap();

        assert!(machine.fire_event("stop").is_err());
        assert_eq!(machine.current_state(), &idle);
        assert!(machine.fire_event("start").unwrap().is_transitioned());
        assert_eq!(machine.current_state(), &busy);
    }

    #[test]
    fn compute_matches_sequential_fire() {
        let mut batch = turnstile();
        let mut single = turnstile();
        let events = ["coin", "kick", "push", "push", "coin", "coin"];

        let run = batch.machine.compute(events, false);
        for event in events {
            let _ = single.machine.fire_event(event);
        }

        assert_eq!(run.final_state(), single.machine.current_state());
        assert_eq!(run.outcomes().len(), events.len());
    }

    #[test]
    fn compute_continues_after_errors() {
        let mut machine = StateMachine::init("a");
        let a = machine.initial_state().clone();
        let b = machine.make_state("b");
        machine
            .link_states(&a, &a, RuleSet::new().with("gt", "bad"))
            .unwrap();
        machine.link_states(&a, &b, RuleSet::eq("good")).unwrap();

        let run = machine.compute(["bad", "good"], false);

        assert_eq!(run.errors().count(), 2);
        assert_eq!(run.final_state(), &a);
        assert!(run.outcomes().iter().all(|o| o.result.is_err()));
    }

    #[test]
    fn compute_to_echoes_every_state() {
        let mut t = turnstile();
        let mut sink = Vec::new();

        let run = t
            .machine
            .compute_to(["coin", "kick", "push"], &mut sink)
            .unwrap();

        let echoed = String::from_utf8(sink).unwrap();
        assert_eq!(echoed, "unlocked\nunlocked\nlocked\n");
        assert_eq!(run.final_state(), &t.locked);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut t = turnstile();
        t.machine.fire_event("coin").unwrap();
        t.machine.reset();

        assert_eq!(t.machine.current_state(), &t.locked);
        assert_eq!(t.machine.state_count(), 2);
    }

    #[test]
    fn history_can_be_disabled() {
        let mut machine =
            StateMachine::with_config("a", MachineConfig::new().record_history(false));
        let a = machine.initial_state().clone();
        machine.link_states(&a, &a, RuleSet::eq("tick")).unwrap();

        machine.fire_event("tick").unwrap();
        assert!(machine.history().is_empty());
    }

    #[test]
    fn history_limit_is_applied() {
        let mut machine = StateMachine::with_config("a", MachineConfig::new().history_limit(1));
        let a = machine.initial_state().clone();
        machine.link_states(&a, &a, RuleSet::eq("tick")).unwrap();

        machine.compute(["tick", "tick", "tick"], false);
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn triggerable_events_are_deduplicated() {
        let t = turnstile();
        let events: Vec<&str> = t
            .machine
            .triggerable_events()
            .into_iter()
            .map(Event::as_str)
            .collect();

        assert_eq!(events, vec!["coin", "push"]);
    }

    #[test]
    fn linking_foreign_state_is_rejected() {
        let mut other = StateMachine::init("x");
        let foreign = other.make_state("y");

        let mut machine = StateMachine::init("a");
        let a = machine.initial_state().clone();

        let err = machine
            .link_states(&a, &foreign, RuleSet::eq("go"))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownState { id: foreign.id() });
    }
}
