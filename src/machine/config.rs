//! Machine configuration.

use crate::core::DEFAULT_HISTORY_CAPACITY;

/// Settings applied when a machine is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    /// Name reported in log events; `None` logs as "unnamed"
    pub label: Option<String>,

    /// Number of transition records retained; 0 disables history
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            label: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MachineConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_history() {
        let config = MachineConfig::default();
        assert_eq!(config.label, None);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn setters_chain() {
        let config = MachineConfig::default()
            .with_label("enemy")
            .with_history_capacity(0);

        assert_eq!(config.label.as_deref(), Some("enemy"));
        assert_eq!(config.history_capacity, 0);
    }
}
