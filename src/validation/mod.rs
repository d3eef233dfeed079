//! Whole-graph validation that reports every problem at once.
//!
//! Uses Stillwater's `Validation` to accumulate ALL violations instead of
//! stopping at the first one, so a machine definition can be fixed in a
//! single pass.
//!
//! # Example
//!
//! ```rust
//! use rulefsm::core::RuleSet;
//! use rulefsm::validation::GraphViolation;
//! use rulefsm::StateMachine;
//! use stillwater::validation::Validation;
//!
//! let mut machine = StateMachine::init("locked");
//! let locked = machine.initial_state().clone();
//! let unlocked = machine.make_state("unlocked");
//! machine.make_state("orphan");
//!
//! machine.link_states(&locked, &unlocked, RuleSet::new().with("gt", "coin")).unwrap();
//!
//! match machine.validate() {
//!     Validation::Failure(violations) => assert_eq!(violations.len(), 3),
//!     Validation::Success(_) => panic!("expected violations"),
//! }
//! ```

mod violations;

pub use violations::GraphViolation;

use crate::core::{Event, StateId};
use crate::graph::{Transition, TransitionGraph, TransitionId};
use std::collections::{HashMap, HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Checked = Validation<(), NonEmptyVec<GraphViolation>>;

/// Validate `graph` as entered from `initial`.
///
/// Returns `Validation::Success(())` when the graph is clean, otherwise
/// `Validation::Failure` with every violation found.
pub fn validate(graph: &TransitionGraph, initial: StateId) -> Checked {
    let mut checks: Vec<Checked> = Vec::new();

    for transition in graph.transitions() {
        checks.push(check_operators(transition));
    }

    for state in graph.states() {
        checks.push(check_shadowing(graph, state.id()));
    }

    checks.push(check_reachability(graph, initial));

    Validation::all_vec(checks).map(|_| ())
}

fn accumulate(violations: Vec<GraphViolation>) -> Checked {
    if violations.is_empty() {
        return Validation::success(());
    }
    let checks: Vec<Checked> = violations
        .into_iter()
        .map(|violation| Validation::fail(violation))
        .collect();
    Validation::all_vec(checks).map(|_| ())
}

fn check_operators(transition: &Transition) -> Checked {
    let violations = transition
        .rules()
        .iter()
        .filter(|(operator, _)| !operator.is_supported())
        .map(|(operator, _)| GraphViolation::UnsupportedOperator {
            transition: transition.id(),
            operator: operator.clone(),
        })
        .collect();
    accumulate(violations)
}

/// An outgoing transition as firing sees it.
struct Reached<'g> {
    transition: &'g Transition,
    /// Events for which this transition is the one taken
    wins: Vec<&'g Event>,
    /// Events it accepts that an earlier transition always takes first
    shadowed: Vec<(&'g Event, TransitionId)>,
}

// Mirrors firing order from `state`. Equality rules after an unsupported
// operator never match, and the first transition carrying an unsupported
// operator fails every event it does not win, so the walk ends there.
fn walk_outgoing(graph: &TransitionGraph, state: StateId) -> Vec<Reached<'_>> {
    let mut first_seen: HashMap<&Event, TransitionId> = HashMap::new();
    let mut reached = Vec::new();

    for transition in graph.outgoing(state) {
        let mut wins = Vec::new();
        let mut shadowed = Vec::new();
        let live = transition
            .rules()
            .iter()
            .take_while(|(operator, _)| operator.is_supported());
        for (_, event) in live {
            match first_seen.get(event) {
                Some(&winner) => shadowed.push((event, winner)),
                None => {
                    first_seen.insert(event, transition.id());
                    wins.push(event);
                }
            }
        }

        let hard_stop = transition
            .rules()
            .iter()
            .any(|(operator, _)| !operator.is_supported());
        reached.push(Reached {
            transition,
            wins,
            shadowed,
        });
        if hard_stop {
            break;
        }
    }
    reached
}

fn check_shadowing(graph: &TransitionGraph, state: StateId) -> Checked {
    let violations = walk_outgoing(graph, state)
        .into_iter()
        .flat_map(|reached| {
            let shadowed = reached.transition.id();
            reached
                .shadowed
                .into_iter()
                .map(move |(event, by)| GraphViolation::ShadowedTransition {
                    state,
                    event: event.clone(),
                    shadowed,
                    by,
                })
        })
        .collect();
    accumulate(violations)
}

fn check_reachability(graph: &TransitionGraph, initial: StateId) -> Checked {
    let mut seen = HashSet::from([initial]);
    let mut queue = VecDeque::from([initial]);

    while let Some(state) = queue.pop_front() {
        for reached in walk_outgoing(graph, state) {
            let to = reached.transition.to();
            if !reached.wins.is_empty() && seen.insert(to) {
                queue.push_back(to);
            }
        }
    }

    let violations = graph
        .states()
        .filter(|s| !seen.contains(&s.id()))
        .map(|s| GraphViolation::UnreachableState { state: s.id() })
        .collect();
    accumulate(violations)
}
