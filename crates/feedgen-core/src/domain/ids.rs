//! Strongly-typed identifiers.
//!
//! Every id is a ULID wrapped in `Id<T>`, where `T` is a zero-sized marker.
//! A `FeedId` and a `ChannelId` therefore cannot be mixed up at a call site,
//! while sharing one implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for id kinds. Supplies the `Display` prefix.
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ULID-backed id.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedMarker {}

impl IdMarker for FeedMarker {
    fn prefix() -> &'static str {
        "feed-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelMarker {}

impl IdMarker for ChannelMarker {
    fn prefix() -> &'static str {
        "channel-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocaleMarker {}

impl IdMarker for LocaleMarker {
    fn prefix() -> &'static str {
        "locale-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageMarker {}

impl IdMarker for MessageMarker {
    fn prefix() -> &'static str {
        "msg-"
    }
}

/// Identifier of a configured feed export.
pub type FeedId = Id<FeedMarker>;

/// Identifier of a sales channel.
pub type ChannelId = Id<ChannelMarker>;

/// Identifier of a locale.
pub type LocaleId = Id<LocaleMarker>;

/// Identifier assigned by the bus to each dispatched message.
pub type MessageId = Id<MessageMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_kind_prefix() {
        let ulid = Ulid::new();

        assert_eq!(FeedId::from_ulid(ulid).to_string(), format!("feed-{ulid}"));
        assert_eq!(ChannelId::from_ulid(ulid).to_string(), format!("channel-{ulid}"));
        assert_eq!(LocaleId::from_ulid(ulid).to_string(), format!("locale-{ulid}"));
        assert_eq!(MessageId::from_ulid(ulid).to_string(), format!("msg-{ulid}"));
    }

    #[test]
    fn ids_survive_json() {
        let feed_id = FeedId::from_ulid(Ulid::new());

        let json = serde_json::to_string(&feed_id).unwrap();
        let back: FeedId = serde_json::from_str(&json).unwrap();

        assert_eq!(feed_id, back);
    }

    #[test]
    fn marker_costs_no_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<FeedId>(), size_of::<Ulid>());
        assert_eq!(size_of::<MessageId>(), 16);
    }
}
