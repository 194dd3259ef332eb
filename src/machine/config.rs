//! Runtime configuration for a machine.

use serde::{Deserialize, Serialize};

/// Default name of the dispatch worker thread.
pub const DEFAULT_WORKER_NAME: &str = "espresso-dispatch";

/// Default number of transition records kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Settings that do not affect transition semantics.
///
/// Missing fields take their defaults when deserialized, so the struct can be
/// embedded in an application's own config file.
///
/// # Example
///
/// ```rust
/// use espresso::MachineConfig;
///
/// let config = MachineConfig::default()
///     .worker_name("door-fsm")
///     .history_limit(0);
///
/// assert_eq!(config.worker_name, "door-fsm");
/// assert!(!config.records_history());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name given to the dispatch worker thread
    pub worker_name: String,

    /// Maximum retained history records; `0` disables history
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn records_history(&self) -> bool {
        self.history_limit > 0
    }
}
