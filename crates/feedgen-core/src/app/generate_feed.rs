//! GenerateFeedHandler - fans a feed generation out into batch commands.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    Channel, ChannelId, Feed, FeedError, FeedId, GenerateBatch, GenerateFeed, Locale, LocaleId,
};
use super::generate_batch::mark_feed_failed;
use crate::ports::{ChannelRepository, CommandBus, FeedRepository, LocaleRepository, dispatch_message};
use crate::typed::{FeedType, FeedTypeRegistry, MessageHandler};

/// Handles `GenerateFeed`.
///
/// 1. resolve feed, channel and locale (each must exist)
/// 2. resolve the feed type from the registry (missing = unrecoverable)
/// 3. add the provider's batch count to the feed's expected batches
/// 4. dispatch one `GenerateBatch` per batch the provider enumerates, in order
///
/// Nothing is rolled back on failure: a provider error after step 3 leaves the
/// counter incremented, and a dispatch error leaves earlier batches dispatched.
pub struct GenerateFeedHandler {
    feeds: Arc<dyn FeedRepository>,
    channels: Arc<dyn ChannelRepository>,
    locales: Arc<dyn LocaleRepository>,
    feed_types: Arc<FeedTypeRegistry>,
    bus: Arc<dyn CommandBus>,
}

impl GenerateFeedHandler {
    pub fn new(
        feeds: Arc<dyn FeedRepository>,
        channels: Arc<dyn ChannelRepository>,
        locales: Arc<dyn LocaleRepository>,
        feed_types: Arc<FeedTypeRegistry>,
        bus: Arc<dyn CommandBus>,
    ) -> Self {
        Self {
            feeds,
            channels,
            locales,
            feed_types,
            bus,
        }
    }

    #[instrument(
        name = "generate_feed",
        skip_all,
        fields(
            feed_id = %message.feed_id,
            channel_id = %message.channel_id,
            locale_id = %message.locale_id
        )
    )]
    pub async fn generate(&self, message: GenerateFeed) -> Result<(), FeedError> {
        let feed = self.get_feed(message.feed_id).await?;
        let channel = self.get_channel(message.channel_id).await?;
        let locale = self.get_locale(message.locale_id).await?;
        let feed_type = self.get_feed_type(&feed)?;
        let data_provider = feed_type.data_provider();

        let batch_count = data_provider.batch_count(&channel, &locale).await?;
        self.feeds.increment_batches(feed.id, batch_count).await?;

        let batches = data_provider.batches(&channel, &locale).await?;
        if batches.len() != batch_count as usize {
            warn!(
                feed_type = feed.feed_type(),
                batch_count,
                enumerated = batches.len(),
                "data provider enumerated a different number of batches than it counted"
            );
        }

        let total = batches.len();
        for (index, batch) in batches.into_iter().enumerate() {
            let command = GenerateBatch::new(feed.clone(), channel.clone(), locale.clone(), batch);
            let message_id = dispatch_message(self.bus.as_ref(), &command).await?;
            debug!(%message_id, batch = index + 1, total, "batch dispatched");
        }

        info!(
            feed = %feed.code,
            channel = %channel.code,
            locale = %locale.code,
            batch_count,
            dispatched = total,
            "feed generation fanned out"
        );
        Ok(())
    }

    async fn get_feed(&self, id: FeedId) -> Result<Feed, FeedError> {
        self.feeds
            .find_by_id(id)
            .await?
            .ok_or_else(|| FeedError::not_found("Feed", id))
    }

    async fn get_channel(&self, id: ChannelId) -> Result<Channel, FeedError> {
        self.channels
            .find_by_id(id)
            .await?
            .ok_or_else(|| FeedError::not_found("Channel", id))
    }

    async fn get_locale(&self, id: LocaleId) -> Result<Locale, FeedError> {
        self.locales
            .find_by_id(id)
            .await?
            .ok_or_else(|| FeedError::not_found("Locale", id))
    }

    fn get_feed_type(&self, feed: &Feed) -> Result<Arc<dyn FeedType>, FeedError> {
        let code = feed.feed_type();
        let missing =
            || FeedError::Unrecoverable(format!("Feed type with code \"{code}\" does not exist"));
        if !self.feed_types.has(code) {
            return Err(missing());
        }
        self.feed_types.get(code).ok_or_else(missing)
    }
}

#[async_trait]
impl MessageHandler<GenerateFeed> for GenerateFeedHandler {
    async fn handle(&self, message: GenerateFeed) -> Result<(), FeedError> {
        self.generate(message).await
    }

    async fn on_dead_letter(&self, message: GenerateFeed, error: &FeedError) -> Result<(), FeedError> {
        mark_feed_failed(self.feeds.as_ref(), message.feed_id, error).await
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use ulid::Ulid;

    use super::*;
    use crate::domain::{Batch, Envelope, MessageId};
    use crate::ports::DataProvider;

    /// Bus that records envelopes and can be told to fail the n-th dispatch.
    #[derive(Default)]
    pub struct RecordingBus {
        pub sent: Mutex<Vec<Envelope>>,
        pub fail_on_call: Option<usize>,
        calls: AtomicUsize,
    }

    impl RecordingBus {
        pub fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::default()
            }
        }

        pub fn sent_batches(&self) -> Vec<GenerateBatch> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|e| {
                    assert_eq!(e.name(), <GenerateBatch as crate::typed::Message>::NAME);
                    serde_json::from_value(e.payload().clone()).unwrap()
                })
                .collect()
        }
    }

    #[async_trait]
    impl CommandBus for RecordingBus {
        async fn dispatch(&self, envelope: Envelope) -> Result<MessageId, FeedError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == Some(call) {
                return Err(FeedError::Dispatch(format!("transport refused call {call}")));
            }
            self.sent.lock().unwrap().push(envelope);
            Ok(MessageId::from_ulid(Ulid::new()))
        }
    }

    /// Provider with a fixed answer for both calls.
    pub struct ScriptedProvider {
        pub count: u32,
        pub batches: Vec<Batch>,
        pub batches_error: Option<FeedError>,
        pub count_calls: AtomicUsize,
        pub batches_calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new(count: u32, batches: Vec<Batch>) -> Self {
            Self {
                count,
                batches,
                batches_error: None,
                count_calls: AtomicUsize::new(0),
                batches_calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> (usize, usize) {
            (
                self.count_calls.load(Ordering::SeqCst),
                self.batches_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl DataProvider for ScriptedProvider {
        async fn batch_count(&self, _: &Channel, _: &Locale) -> Result<u32, FeedError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.count)
        }

        async fn batches(&self, _: &Channel, _: &Locale) -> Result<Vec<Batch>, FeedError> {
            self.batches_calls.fetch_add(1, Ordering::SeqCst);
            match &self.batches_error {
                Some(err) => Err(err.clone()),
                None => Ok(self.batches.clone()),
            }
        }
    }

    pub struct ScriptedFeedType {
        pub code: &'static str,
        pub provider: Arc<ScriptedProvider>,
    }

    impl FeedType for ScriptedFeedType {
        fn code(&self) -> &str {
            self.code
        }

        fn data_provider(&self) -> Arc<dyn DataProvider> {
            self.provider.clone()
        }
    }
}
