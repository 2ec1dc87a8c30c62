//! AppBuilder - wiring and startup validation.

use std::sync::Arc;

use crate::domain::{Envelope, FeedError};
use crate::typed::{HandlerRegistry, Message, MessageHandler, RegistryError};

/// Builds an `App` from message handlers.
///
/// ```ignore
/// let app = AppBuilder::new()
///     .register::<GenerateFeed, _>(generate_feed_handler)?
///     .register::<GenerateBatch, _>(generate_batch_handler)?
///     .expect_messages(&[GenerateFeed::NAME, GenerateBatch::NAME])
///     .build()?;
/// ```
///
/// `build()` fails if an expected message has no handler, so a missing
/// registration is caught at startup rather than when the first message of
/// that kind is dead-lettered.
pub struct AppBuilder {
    registry: HandlerRegistry,
    expected: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing handlers for messages: {0:?}")]
    MissingHandlers(Vec<String>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            expected: Vec::new(),
        }
    }

    pub fn register<M: Message, H: MessageHandler<M> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register::<M, H>(handler)?;
        Ok(self)
    }

    pub fn expect_messages(mut self, names: &[&str]) -> Self {
        self.expected.extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let registered = self.registry.registered_names();
        let missing: Vec<String> = self
            .expected
            .into_iter()
            .filter(|name| !registered.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::MissingHandlers(missing));
        }
        Ok(App {
            registry: Arc::new(self.registry),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes envelopes to their registered handler.
pub struct App {
    registry: Arc<HandlerRegistry>,
}

impl App {
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Execute one envelope. An envelope nobody handles is unrecoverable.
    pub async fn execute(&self, envelope: &Envelope) -> Result<(), FeedError> {
        let handler = self.registry.get(envelope.name()).ok_or_else(|| {
            FeedError::Unrecoverable(format!("no handler registered for message '{}'", envelope.name()))
        })?;
        handler.handle_dyn(envelope.payload().clone()).await
    }

    /// Let the message's handler react to the bus giving up on `envelope`.
    /// Envelopes nobody handles have no one to notify.
    pub async fn dead_letter(&self, envelope: &Envelope, error: &FeedError) -> Result<(), FeedError> {
        match self.registry.get(envelope.name()) {
            Some(handler) => handler.dead_letter_dyn(envelope.payload().clone(), error).await,
            None => Ok(()),
        }
    }
}
