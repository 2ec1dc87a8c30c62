use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Channel, ChannelId, FeedError, Locale, LocaleId};
use crate::ports::{ChannelRepository, LocaleRepository};

#[derive(Default)]
pub struct InMemoryChannelRepository {
    channels: RwLock<HashMap<ChannelId, Channel>>,
}

impl InMemoryChannelRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, channel: Channel) {
        self.channels.write().await.insert(channel.id, channel);
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn find_by_id(&self, id: ChannelId) -> Result<Option<Channel>, FeedError> {
        Ok(self.channels.read().await.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryLocaleRepository {
    locales: RwLock<HashMap<LocaleId, Locale>>,
}

impl InMemoryLocaleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, locale: Locale) {
        self.locales.write().await.insert(locale.id, locale);
    }
}

#[async_trait]
impl LocaleRepository for InMemoryLocaleRepository {
    async fn find_by_id(&self, id: LocaleId) -> Result<Option<Locale>, FeedError> {
        Ok(self.locales.read().await.get(&id).cloned())
    }
}
