use serde::{Deserialize, Serialize};

/// Number of bus messages in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusCounts {
    pub queued: usize,
    pub running: usize,
    pub succeeded: usize,
    pub retry_scheduled: usize,
    pub dead: usize,
}

impl BusCounts {
    /// Nothing queued, running or waiting for a retry.
    pub fn is_idle(&self) -> bool {
        self.queued == 0 && self.running == 0 && self.retry_scheduled == 0
    }
}
