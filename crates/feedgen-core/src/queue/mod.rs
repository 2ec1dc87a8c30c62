//! Queue module: the in-memory command bus, its state machine and retry policy.

mod memory;
mod record;
mod retry;
mod state;

pub use memory::InMemoryBus;
pub use record::{MessageRecord, MessageStatus};
pub use retry::RetryPolicy;
pub use state::MessageState;

use async_trait::async_trait;

use crate::domain::{Envelope, FeedError, MessageId};
use crate::observability::BusCounts;

/// A message leased to one worker, which must either `ack` or `fail` it.
///
/// The bus owns state transitions; the worker only reports the result.
#[async_trait]
pub trait MessageLease: Send {
    fn message_id(&self) -> MessageId;

    fn envelope(&self) -> &Envelope;

    /// Attempt number of this delivery (1 for the first).
    fn attempt(&self) -> u32;

    async fn ack(self: Box<Self>) -> Result<(), FeedError>;

    /// Report a failure; the bus decides between retry and dead-letter and
    /// returns the state it chose (`RetryScheduled` or `Dead`).
    async fn fail(self: Box<Self>, error: &FeedError) -> Result<MessageState, FeedError>;
}

/// Consumer side of the bus.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Wait until a message is ready and lease it.
    async fn lease(&self) -> Box<dyn MessageLease>;

    async fn counts_by_state(&self) -> BusCounts;
}
