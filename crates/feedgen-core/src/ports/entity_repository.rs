use async_trait::async_trait;

use crate::domain::{Channel, ChannelId, FeedError, Locale, LocaleId};

/// Read-only channel lookup.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    async fn find_by_id(&self, id: ChannelId) -> Result<Option<Channel>, FeedError>;
}

/// Read-only locale lookup.
#[async_trait]
pub trait LocaleRepository: Send + Sync {
    async fn find_by_id(&self, id: LocaleId) -> Result<Option<Locale>, FeedError>;
}
