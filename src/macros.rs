//! Macros for ergonomic rule construction.

/// Build a [`RuleSet`](crate::core::RuleSet) from `operator => event` pairs.
///
/// Pairs are inserted in order; a repeated operator replaces the earlier
/// event.
///
/// # Example
///
/// ```
/// use rulefsm::core::{Event, Operator};
/// use rulefsm::rules;
///
/// let coin = rules! { "eq" => "coin" };
/// assert_eq!(coin.get(&Operator::Eq), Some(&Event::from("coin")));
///
/// let mixed = rules! {
///     "eq" => "push",
///     "gt" => "push",
/// };
/// assert_eq!(mixed.len(), 2);
/// ```
#[macro_export]
macro_rules! rules {
    () => {
        $crate::core::RuleSet::new()
    };
    ($($operator:expr => $event:expr),+ $(,)?) => {{
        let mut rules = $crate::core::RuleSet::new();
        $(
            rules.insert($operator, $event);
        )+
        rules
    }};
}
