//! States: identity-bearing graph nodes with a displayable value.
//!
//! A state's identity is its [`StateId`]. The value is only a label, so two
//! states carrying the same value are still distinct nodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a state, unique within one graph.
///
/// Ids are handed out in creation order starting at zero and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) u64);

impl StateId {
    /// Raw numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value carried by a state.
///
/// The union is closed. `Opaque` stands for a value the engine has no textual
/// form for and always renders as the empty string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StateValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Opaque,
}

impl StateValue {
    /// Render the value using its intrinsic type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rulefsm::core::StateValue;
    ///
    /// assert_eq!(StateValue::Int(42).render(), "42");
    /// assert_eq!(StateValue::Float(1.5).render(), "1.500000");
    /// assert_eq!(StateValue::Bool(true).render(), "true");
    /// assert_eq!(StateValue::from("locked").render(), "locked");
    /// assert_eq!(StateValue::Opaque.render(), "");
    /// ```
    pub fn render(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(x) if x.is_nan() => "NaN".to_string(),
            Self::Float(x) if x.is_infinite() => {
                if x.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
            }
            Self::Float(x) => format!("{x:.6}"),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::Opaque => String::new(),
        }
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for StateValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A node of the transition graph.
///
/// States are created by the state machine and are immutable afterwards.
/// Equality and hashing consider only the id.
///
/// # Example
///
/// ```rust
/// use rulefsm::StateMachine;
///
/// let mut machine = StateMachine::init("locked");
/// let a = machine.make_state("unlocked");
/// let b = machine.make_state("unlocked");
///
/// assert_ne!(a, b);
/// assert_eq!(a.render(), b.render());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    id: StateId,
    value: StateValue,
}

impl State {
    pub(crate) fn new(id: StateId, value: StateValue) -> Self {
        Self { id, value }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn value(&self) -> &StateValue {
        &self.value
    }

    /// Textual form of the state's value.
    pub fn render(&self) -> String {
        self.value.render()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_uses_intrinsic_type() {
        assert_eq!(StateValue::from(7).render(), "7");
        assert_eq!(StateValue::from(-3i64).render(), "-3");
        assert_eq!(StateValue::from(0.25f64).render(), "0.250000");
        assert_eq!(StateValue::from(2.5f32).render(), "2.500000");
        assert_eq!(StateValue::from(false).render(), "false");
        assert_eq!(StateValue::from(String::from("open")).render(), "open");
    }

    #[test]
    fn non_finite_floats_render_like_printf() {
        assert_eq!(StateValue::Float(f64::INFINITY).render(), "+Inf");
        assert_eq!(StateValue::Float(f64::NEG_INFINITY).render(), "-Inf");
        assert_eq!(StateValue::Float(f64::NAN).render(), "NaN");
        assert_eq!(StateValue::from(f32::INFINITY).render(), "+Inf");
    }

    #[test]
    fn opaque_value_renders_empty() {
        let state = State::new(StateId(0), StateValue::Opaque);
        assert_eq!(state.render(), "");
        assert_eq!(state.to_string(), "");
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = State::new(StateId(1), StateValue::from("same"));
        let b = State::new(StateId(2), StateValue::from("same"));
        let c = State::new(StateId(1), StateValue::from("different"));

        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn display_matches_render() {
        let state = State::new(StateId(3), StateValue::from(true));
        assert_eq!(format!("{state}"), state.render());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = State::new(StateId(4), StateValue::from(12));
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: State = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
        assert_eq!(deserialized.value(), &StateValue::Int(12));
    }
}
