//! Machine configuration.

/// Configuration applied when a machine is created.
///
/// # Example
///
/// ```rust
/// use rulefsm::{MachineConfig, StateMachine};
///
/// let config = MachineConfig::new().history_limit(16);
/// let machine = StateMachine::with_config("idle", config);
/// assert!(machine.history().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    pub(crate) record_history: bool,
    pub(crate) history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self {
            record_history: true,
            history_limit: None,
        }
    }

    /// Whether taken transitions are recorded (default: on)
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Keep only the most recent `n` history records
    pub fn history_limit(mut self, n: usize) -> Self {
        self.history_limit = Some(n);
        self
    }

    pub fn records_history(&self) -> bool {
        self.record_history
    }

    pub fn limit(&self) -> Option<usize> {
        self.history_limit
    }
}
