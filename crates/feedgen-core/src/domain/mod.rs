//! Domain model (ids, entities, commands, errors).

pub mod ids;
pub mod feed;
pub mod channel;
pub mod batch;
pub mod command;
pub mod errors;

pub use self::batch::Batch;
pub use self::channel::{Channel, Locale};
pub use self::command::{Envelope, GenerateBatch, GenerateFeed};
pub use self::errors::{ErrorKind, FeedError};
pub use self::feed::{Feed, FeedState};
pub use self::ids::{ChannelId, FeedId, LocaleId, MessageId};
