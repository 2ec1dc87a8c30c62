//! Ports - the seams between the orchestrator and the outside world.
//!
//! Each trait hides an external collaborator (ORM repositories, the message
//! broker, data providers). `impls` and `queue` ship in-memory versions.

pub mod feed_repository;
pub mod entity_repository;
pub mod data_provider;
pub mod command_bus;
pub mod clock;
pub mod id_generator;

pub use self::feed_repository::FeedRepository;
pub use self::entity_repository::{ChannelRepository, LocaleRepository};
pub use self::data_provider::DataProvider;
pub use self::command_bus::{CommandBus, dispatch_message};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
