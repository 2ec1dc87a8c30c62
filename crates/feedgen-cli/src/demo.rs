//! Demo feed type: splits a product catalog into fixed-size pages.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use feedgen_core::domain::{Batch, Channel, FeedError, Locale};
use feedgen_core::ports::DataProvider;
use feedgen_core::typed::FeedType;

pub const CATALOG_FEED_TYPE: &str = "product_catalog";

/// Pages `products` items into batches of `batch_size`.
pub struct CatalogProvider {
    products: u32,
    batch_size: u32,
}

impl CatalogProvider {
    pub fn new(products: u32, batch_size: u32) -> Self {
        Self {
            products,
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl DataProvider for CatalogProvider {
    async fn batch_count(&self, _channel: &Channel, _locale: &Locale) -> Result<u32, FeedError> {
        Ok(self.products.div_ceil(self.batch_size))
    }

    async fn batches(&self, channel: &Channel, locale: &Locale) -> Result<Vec<Batch>, FeedError> {
        Ok((0..self.products)
            .step_by(self.batch_size as usize)
            .map(|offset| {
                Batch::new(json!({
                    "channel": channel.code,
                    "locale": locale.code,
                    "offset": offset,
                    "limit": self.batch_size.min(self.products - offset),
                }))
            })
            .collect())
    }
}

pub struct CatalogFeedType {
    provider: Arc<CatalogProvider>,
}

impl CatalogFeedType {
    pub fn new(provider: CatalogProvider) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

impl FeedType for CatalogFeedType {
    fn code(&self) -> &str {
        CATALOG_FEED_TYPE
    }

    fn data_provider(&self) -> Arc<dyn DataProvider> {
        self.provider.clone()
    }
}

#[cfg(test)]
mod tests {
    use feedgen_core::domain::{ChannelId, LocaleId};
    use feedgen_core::ports::{IdGenerator, SystemClock, UlidGenerator};

    use super::*;

    fn context() -> (Channel, Locale) {
        let ids = UlidGenerator::new(SystemClock);
        (
            Channel::new(ChannelId::from(ids.next_ulid()), "WEB"),
            Locale::new(LocaleId::from(ids.next_ulid()), "en_US"),
        )
    }

    #[tokio::test]
    async fn count_and_enumeration_agree() {
        let (channel, locale) = context();
        let provider = CatalogProvider::new(250, 100);

        let count = provider.batch_count(&channel, &locale).await.unwrap();
        let batches = provider.batches(&channel, &locale).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].payload()["offset"], json!(200));
        assert_eq!(batches[2].payload()["limit"], json!(50));
    }

    #[tokio::test]
    async fn empty_catalog_has_no_batches() {
        let (channel, locale) = context();
        let provider = CatalogProvider::new(0, 100);

        assert_eq!(provider.batch_count(&channel, &locale).await.unwrap(), 0);
        assert!(provider.batches(&channel, &locale).await.unwrap().is_empty());
    }
}
