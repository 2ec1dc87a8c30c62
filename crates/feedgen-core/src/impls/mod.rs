//! Impls - in-memory port implementations (development and tests).
//!
//! A production deployment backs these ports with its own database; the bus
//! lives in `queue`.

pub mod memory_feeds;
pub mod memory_entities;

pub use self::memory_feeds::InMemoryFeedRepository;
pub use self::memory_entities::{InMemoryChannelRepository, InMemoryLocaleRepository};
