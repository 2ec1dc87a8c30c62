//! HandlerRegistry - message name -> handler.
//!
//! Built mutably at startup, then shared read-only behind an `Arc`, so lookups
//! never take a lock.

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{DynHandler, MessageHandler, TypedHandler};
use super::message::Message;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn DynHandler>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("handler for message '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("feed type with code '{0}' is already registered")]
    DuplicateFeedType(String),
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<M: Message, H: MessageHandler<M> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        let name = M::NAME.to_string();
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.handlers
            .insert(name, Arc::new(TypedHandler::<M, H>::new(handler)));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DynHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn registered_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::handler::fixtures::{Ping, PingHandler, Pong, PongHandler};

    #[test]
    fn register_and_get() {
        let mut registry = HandlerRegistry::new();
        registry.register::<Ping, _>(PingHandler::default()).unwrap();

        let handler = registry.get(Ping::NAME).unwrap();
        assert_eq!(handler.message_name(), Ping::NAME);
        assert!(registry.get(Pong::NAME).is_none());
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register::<Ping, _>(PingHandler::default()).unwrap();

        let result = registry.register::<Ping, _>(PingHandler::default());

        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(name)) if name == Ping::NAME));
    }

    #[test]
    fn registered_names_lists_every_message() {
        let mut registry = HandlerRegistry::new();
        registry.register::<Ping, _>(PingHandler::default()).unwrap();
        registry.register::<Pong, _>(PongHandler).unwrap();

        let mut names = registry.registered_names();
        names.sort();

        assert_eq!(names, vec![Ping::NAME.to_string(), Pong::NAME.to_string()]);
    }
}
