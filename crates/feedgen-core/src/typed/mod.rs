//! Typed - typed message API and the feed type registry.
//!
//! # Two layers
//! - **Typed**: `Message`, `MessageHandler<M>` - a handler only ever sees its own message type
//! - **Dyn**: `DynHandler` - object-safe, payload arrives as JSON, stored in `HandlerRegistry`

pub mod message;
pub mod handler;
pub mod registry;
pub mod feed_type;

pub use self::message::Message;
pub use self::handler::{DynHandler, MessageHandler, TypedHandler};
pub use self::registry::{HandlerRegistry, RegistryError};
pub use self::feed_type::{FeedType, FeedTypeRegistry};
