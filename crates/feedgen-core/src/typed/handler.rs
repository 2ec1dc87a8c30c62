//! MessageHandler trait and its type-erased counterpart.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::message::Message;
use crate::domain::FeedError;

/// Handles one message type.
///
/// ```ignore
/// struct PurgeFeedHandler;
///
/// #[async_trait]
/// impl MessageHandler<PurgeFeed> for PurgeFeedHandler {
///     async fn handle(&self, message: PurgeFeed) -> Result<(), FeedError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MessageHandler<M: Message>: Send + Sync {
    async fn handle(&self, message: M) -> Result<(), FeedError>;

    /// Called once the bus has given up on `message`. Defaults to a no-op.
    async fn on_dead_letter(&self, _message: M, _error: &FeedError) -> Result<(), FeedError> {
        Ok(())
    }
}

/// Object-safe handler, so handlers for different message types can share one
/// `HashMap<String, Arc<dyn DynHandler>>`.
#[async_trait]
pub trait DynHandler: Send + Sync {
    async fn handle_dyn(&self, payload: serde_json::Value) -> Result<(), FeedError>;
    async fn dead_letter_dyn(&self, payload: serde_json::Value, error: &FeedError) -> Result<(), FeedError>;
    fn message_name(&self) -> &str;
}

/// Adapts a `MessageHandler<M>` into a `DynHandler` by decoding the payload first.
pub struct TypedHandler<M: Message, H: MessageHandler<M>> {
    handler: H,
    _marker: PhantomData<M>,
}

impl<M: Message, H: MessageHandler<M>> TypedHandler<M, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<M: Message, H: MessageHandler<M>> DynHandler for TypedHandler<M, H> {
    async fn handle_dyn(&self, payload: serde_json::Value) -> Result<(), FeedError> {
        let message = decode::<M>(payload)?;
        self.handler.handle(message).await
    }

    async fn dead_letter_dyn(&self, payload: serde_json::Value, error: &FeedError) -> Result<(), FeedError> {
        let message = decode::<M>(payload)?;
        self.handler.on_dead_letter(message, error).await
    }

    fn message_name(&self) -> &str {
        M::NAME
    }
}

fn decode<M: Message>(payload: serde_json::Value) -> Result<M, FeedError> {
    serde_json::from_value(payload).map_err(|e| FeedError::Decode(format!("decode {}: {e}", M::NAME)))
}
