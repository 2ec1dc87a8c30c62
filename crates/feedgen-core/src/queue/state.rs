//! Message state machine.

use serde::{Deserialize, Serialize};

/// State of a message on the bus.
///
/// State transitions:
/// - Queued -> Running -> Succeeded
/// - Queued -> Running -> RetryScheduled -> Queued (until max_attempts)
/// - Queued -> Running -> Dead (max_attempts reached, or non-retryable error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageState {
    Queued,
    Running,
    Succeeded,
    RetryScheduled,
    Dead,
}
