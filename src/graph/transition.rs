//! Directed, rule-guarded edges between states.

use crate::core::{Event, Operator, RuleSet, StateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a transition, unique within one graph.
///
/// Transition ids use their own counter, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub(crate) u64);

impl TransitionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge `from -> to` guarded by a rule set.
///
/// Several transitions may join the same pair of states; they differ only by
/// their rules and their creation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    id: TransitionId,
    from: StateId,
    to: StateId,
    rules: RuleSet,
}

impl Transition {
    pub(crate) fn new(id: TransitionId, from: StateId, to: StateId, rules: RuleSet) -> Self {
        Self {
            id,
            from,
            to,
            rules,
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether this transition accepts `event` (pure).
    pub fn accepts(&self, event: &Event) -> Result<bool, &Operator> {
        self.rules.matches(event)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(rules: RuleSet) -> Transition {
        Transition::new(TransitionId(1), StateId(0), StateId(1), rules)
    }

    #[test]
    fn accepts_matching_event() {
        let t = transition(RuleSet::eq("coin"));

        assert_eq!(t.accepts(&Event::from("coin")), Ok(true));
        assert_eq!(t.accepts(&Event::from("push")), Ok(false));
    }

    #[test]
    fn accepts_reports_unsupported_operator() {
        let t = transition(RuleSet::new().with("gt", "coin"));
        let err = t.accepts(&Event::from("coin")).unwrap_err();

        assert_eq!(err.tag(), "gt");
    }

    #[test]
    fn self_loop_is_detected() {
        let t = Transition::new(TransitionId(2), StateId(3), StateId(3), RuleSet::eq("push"));
        assert!(t.is_self_loop());
        assert!(!transition(RuleSet::eq("push")).is_self_loop());
    }
}
