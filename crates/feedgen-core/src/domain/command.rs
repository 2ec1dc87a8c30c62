//! Commands carried on the bus, and the envelope that carries them.

use serde::{Deserialize, Serialize};

use super::batch::Batch;
use super::channel::{Channel, Locale};
use super::errors::FeedError;
use super::feed::Feed;
use super::ids::{ChannelId, FeedId, LocaleId};
use crate::typed::Message;

/// Asks for a feed to be generated for one channel / locale pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateFeed {
    pub feed_id: FeedId,
    pub channel_id: ChannelId,
    pub locale_id: LocaleId,
}

impl GenerateFeed {
    pub fn new(feed_id: FeedId, channel_id: ChannelId, locale_id: LocaleId) -> Self {
        Self {
            feed_id,
            channel_id,
            locale_id,
        }
    }
}

impl Message for GenerateFeed {
    const NAME: &'static str = "feedgen.feed.generate.v1";
}

/// One unit of feed generation work, fanned out by the `GenerateFeed` handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateBatch {
    pub feed: Feed,
    pub channel: Channel,
    pub locale: Locale,
    pub batch: Batch,
}

impl GenerateBatch {
    pub fn new(feed: Feed, channel: Channel, locale: Locale, batch: Batch) -> Self {
        Self {
            feed,
            channel,
            locale,
            batch,
        }
    }
}

impl Message for GenerateBatch {
    const NAME: &'static str = "feedgen.feed.generate_batch.v1";
}

/// Message name + JSON payload, as stored and delivered by the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    name: String,
    payload: serde_json::Value,
}

impl Envelope {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Encode a typed message.
    pub fn wrap<M: Message>(message: &M) -> Result<Self, FeedError> {
        let payload = serde_json::to_value(message)
            .map_err(|e| FeedError::Decode(format!("encode {}: {e}", M::NAME)))?;
        Ok(Self::new(M::NAME, payload))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}
