//! App - message handlers and the machinery that runs them.
//!
//! - **GenerateFeedHandler**: fans a feed out into batch commands
//! - **GenerateBatchHandler**: tracks batch completion per feed
//! - **AppBuilder / App**: handler wiring with startup validation
//! - **WorkerGroup**: bus consumers

pub mod generate_feed;
pub mod generate_batch;
pub mod builder;
pub mod worker;

pub use self::generate_feed::GenerateFeedHandler;
pub use self::generate_batch::GenerateBatchHandler;
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::worker::WorkerGroup;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use ulid::Ulid;

    use super::generate_feed::fakes::{ScriptedFeedType, ScriptedProvider};
    use super::*;
    use crate::domain::{Batch, Channel, ChannelId, Feed, FeedId, FeedState, GenerateBatch, GenerateFeed, Locale, LocaleId};
    use crate::impls::{InMemoryChannelRepository, InMemoryFeedRepository, InMemoryLocaleRepository};
    use crate::ports::{FeedRepository, SystemClock, UlidGenerator, dispatch_message};
    use crate::queue::{InMemoryBus, MessageQueue, MessageState, RetryPolicy};
    use crate::typed::{FeedTypeRegistry, Message};

    struct World {
        feeds: Arc<InMemoryFeedRepository>,
        bus: Arc<InMemoryBus>,
        app: Arc<App>,
        channel_id: ChannelId,
        locale_id: LocaleId,
    }

    async fn world(batches: usize) -> World {
        let feeds = Arc::new(InMemoryFeedRepository::new());
        let channels = Arc::new(InMemoryChannelRepository::new());
        let locales = Arc::new(InMemoryLocaleRepository::new());
        let channel_id = ChannelId::from_ulid(Ulid::new());
        let locale_id = LocaleId::from_ulid(Ulid::new());
        channels.insert(Channel::new(channel_id, "WEB")).await;
        locales.insert(Locale::new(locale_id, "en_US")).await;

        let batch_list = (0..batches).map(|i| Batch::new(json!({ "page": i }))).collect();
        let mut feed_types = FeedTypeRegistry::new();
        feed_types
            .register(Arc::new(ScriptedFeedType {
                code: "catalog",
                provider: Arc::new(ScriptedProvider::new(batches as u32, batch_list)),
            }))
            .unwrap();

        let bus = Arc::new(InMemoryBus::new(
            RetryPolicy {
                base_delay: Duration::from_millis(5),
                multiplier: 1.0,
                max_delay: Duration::from_secs(1),
                max_attempts: 3,
            },
            Arc::new(UlidGenerator::new(SystemClock)),
            Arc::new(SystemClock),
        ));

        let app = AppBuilder::new()
            .register::<GenerateFeed, _>(GenerateFeedHandler::new(
                feeds.clone(),
                channels,
                locales,
                Arc::new(feed_types),
                bus.clone(),
            ))
            .unwrap()
            .register::<GenerateBatch, _>(GenerateBatchHandler::new(feeds.clone()))
            .unwrap()
            .expect_messages(&[GenerateFeed::NAME, GenerateBatch::NAME])
            .build()
            .unwrap();

        World {
            feeds,
            bus,
            app: Arc::new(app),
            channel_id,
            locale_id,
        }
    }

    async fn add_processing_feed(world: &World, feed_type: &str) -> FeedId {
        let id = FeedId::from_ulid(Ulid::new());
        world.feeds.insert(Feed::new(id, "google", feed_type)).await;
        world.feeds.set_state(id, FeedState::Processing).await.unwrap();
        id
    }

    async fn run_until_idle(world: &World) {
        let workers = WorkerGroup::spawn(2, world.bus.clone(), world.app.clone());
        for _ in 0..400 {
            if world.bus.counts_by_state().await.is_idle() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        workers.shutdown_and_join().await;
    }

    #[tokio::test]
    async fn generated_feed_becomes_ready() {
        let world = world(4).await;
        let feed_id = add_processing_feed(&world, "catalog").await;

        dispatch_message(
            world.bus.as_ref(),
            &GenerateFeed::new(feed_id, world.channel_id, world.locale_id),
        )
        .await
        .unwrap();
        run_until_idle(&world).await;

        let feed = world.feeds.find_by_id(feed_id).await.unwrap().unwrap();
        assert_eq!(feed.state, FeedState::Ready);
        assert_eq!((feed.batches, feed.finished_batches), (4, 4));

        let counts = world.bus.counts_by_state().await;
        assert_eq!(counts.succeeded, 5);
        assert_eq!(counts.dead, 0);
    }

    #[tokio::test]
    async fn unknown_feed_type_is_dead_lettered_and_feed_errored() {
        let world = world(2).await;
        let feed_id = add_processing_feed(&world, "facebook").await;

        let message_id = dispatch_message(
            world.bus.as_ref(),
            &GenerateFeed::new(feed_id, world.channel_id, world.locale_id),
        )
        .await
        .unwrap();
        run_until_idle(&world).await;

        let status = world.bus.status(message_id).await.unwrap();
        assert_eq!(status.state, MessageState::Dead);
        assert_eq!(status.attempts, 1);
        assert_eq!(
            status.last_error.as_deref(),
            Some(r#"Feed type with code "facebook" does not exist"#)
        );

        let feed = world.feeds.find_by_id(feed_id).await.unwrap().unwrap();
        assert_eq!(feed.state, FeedState::Error);
        assert_eq!(feed.batches, 0);
    }

    #[tokio::test]
    async fn missing_feed_is_retried_then_dead_lettered() {
        let world = world(1).await;
        let ghost = FeedId::from_ulid(Ulid::new());

        let message_id = dispatch_message(
            world.bus.as_ref(),
            &GenerateFeed::new(ghost, world.channel_id, world.locale_id),
        )
        .await
        .unwrap();
        run_until_idle(&world).await;

        let status = world.bus.status(message_id).await.unwrap();
        assert_eq!(status.state, MessageState::Dead);
        assert_eq!(status.attempts, 3);
    }
}
