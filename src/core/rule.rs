//! Rules deciding whether a transition accepts an event.
//!
//! A rule pairs a comparison [`Operator`] with an expected [`Event`]. A
//! transition carries a [`RuleSet`] and is taken when one of its rules
//! matches the fired event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison kind of a rule.
///
/// Only equality is evaluated. Any other tag parses to `Unsupported` and
/// makes firing fail when the rule is reached. Operators are built from
/// their tag, so `"eq"` always yields `Eq`.
///
/// # Example
///
/// ```rust
/// use rulefsm::core::Operator;
///
/// assert_eq!(Operator::from("eq"), Operator::Eq);
/// assert!(matches!(Operator::from("gt"), Operator::Unsupported(ref tag) if tag.as_str() == "gt"));
/// assert_eq!(Operator::Eq.tag(), "eq");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Unsupported(UnsupportedTag),
}

/// Tag of an operator the engine does not evaluate.
///
/// Only obtainable by parsing a tag other than `"eq"` into an [`Operator`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnsupportedTag(String);

impl UnsupportedTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnsupportedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Operator {
    pub const EQ_TAG: &'static str = "eq";

    /// Symbolic tag of the operator.
    pub fn tag(&self) -> &str {
        match self {
            Self::Eq => Self::EQ_TAG,
            Self::Unsupported(tag) => tag.as_str(),
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Eq)
    }
}

impl From<&str> for Operator {
    fn from(tag: &str) -> Self {
        if tag == Self::EQ_TAG {
            Self::Eq
        } else {
            Self::Unsupported(UnsupportedTag(tag.to_string()))
        }
    }
}

impl From<String> for Operator {
    fn from(tag: String) -> Self {
        if tag == Self::EQ_TAG {
            Self::Eq
        } else {
            Self::Unsupported(UnsupportedTag(tag))
        }
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Eq => Operator::EQ_TAG.to_string(),
            Operator::Unsupported(UnsupportedTag(tag)) => tag,
        }
    }
}

impl FromStr for Operator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Opaque token fed to the machine; compared by exact equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(String);

impl Event {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Event {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for Event {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&String> for Event {
    fn from(token: &String) -> Self {
        Self(token.clone())
    }
}

impl PartialEq<str> for Event {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Event {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from operator to expected event, kept in insertion order.
///
/// Operators are unique within a set: inserting an operator that is already
/// present replaces its event in place. Evaluation walks the rules in
/// insertion order.
///
/// # Example
///
/// ```rust
/// use rulefsm::core::{Event, Operator, RuleSet};
///
/// let rules = RuleSet::eq("coin");
/// assert_eq!(rules.matches(&Event::from("coin")), Ok(true));
/// assert_eq!(rules.matches(&Event::from("push")), Ok(false));
///
/// let odd = RuleSet::new().with("gt", "coin");
/// assert_eq!(
///     odd.matches(&Event::from("coin")),
///     Err(&Operator::from("gt"))
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(Operator, Event)>", into = "Vec<(Operator, Event)>")]
pub struct RuleSet {
    rules: Vec<(Operator, Event)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// A set holding the single rule `eq => event`.
    pub fn eq(event: impl Into<Event>) -> Self {
        Self::new().with(Operator::Eq, event)
    }

    /// Add a rule, returning the updated set.
    pub fn with(mut self, operator: impl Into<Operator>, event: impl Into<Event>) -> Self {
        self.insert(operator, event);
        self
    }

    /// Insert a rule. Returns the event previously bound to the operator.
    pub fn insert(
        &mut self,
        operator: impl Into<Operator>,
        event: impl Into<Event>,
    ) -> Option<Event> {
        let operator = operator.into();
        let event = event.into();
        match self.rules.iter_mut().find(|(op, _)| *op == operator) {
            Some((_, existing)) => Some(std::mem::replace(existing, event)),
            None => {
                self.rules.push((operator, event));
                None
            }
        }
    }

    pub fn get(&self, operator: &Operator) -> Option<&Event> {
        self.rules
            .iter()
            .find(|(op, _)| op == operator)
            .map(|(_, event)| event)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Operator, &Event)> {
        self.rules.iter().map(|(op, event)| (op, event))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the rules against an event, in insertion order.
    ///
    /// Returns `Ok(true)` on the first equality rule expecting `event`. An
    /// unsupported operator reached before any match stops evaluation and is
    /// returned as the error.
    pub fn matches(&self, event: &Event) -> Result<bool, &Operator> {
        for (operator, expected) in &self.rules {
            match operator {
                Operator::Eq => {
                    if expected == event {
                        return Ok(true);
                    }
                }
                Operator::Unsupported(_) => return Err(operator),
            }
        }
        Ok(false)
    }

    /// Events accepted by the equality rules of this set.
    pub fn accepted_events(&self) -> impl Iterator<Item = &Event> {
        self.rules
            .iter()
            .filter(|(op, _)| op.is_supported())
            .map(|(_, event)| event)
    }
}

// Deserialized rules go through `insert` so repeated operators collapse.
impl From<Vec<(Operator, Event)>> for RuleSet {
    fn from(rules: Vec<(Operator, Event)>) -> Self {
        rules.into_iter().collect()
    }
}

impl From<RuleSet> for Vec<(Operator, Event)> {
    fn from(rules: RuleSet) -> Self {
        rules.rules
    }
}

impl<O, E> FromIterator<(O, E)> for RuleSet
where
    O: Into<Operator>,
    E: Into<Event>,
{
    fn from_iter<I: IntoIterator<Item = (O, E)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (operator, event) in iter {
            rules.insert(operator, event);
        }
        rules
    }
}
