//! CommandBus port - outbound message dispatch.

use async_trait::async_trait;

use crate::domain::{Envelope, FeedError, MessageId};
use crate::typed::Message;

/// Fire-and-forget dispatch onto the bus.
///
/// `dispatch` returns once the message is accepted; it never waits for the
/// message to be handled.
#[async_trait]
pub trait CommandBus: Send + Sync {
    async fn dispatch(&self, envelope: Envelope) -> Result<MessageId, FeedError>;
}

/// Encode a typed message and dispatch it.
pub async fn dispatch_message<M: Message>(
    bus: &dyn CommandBus,
    message: &M,
) -> Result<MessageId, FeedError> {
    bus.dispatch(Envelope::wrap(message)?).await
}
