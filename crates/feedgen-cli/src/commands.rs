//! Subcommand implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use feedgen_core::app::{AppBuilder, GenerateBatchHandler, GenerateFeedHandler, WorkerGroup};
use feedgen_core::config::FeedgenConfig;
use feedgen_core::domain::{Channel, Feed, FeedId, FeedState, GenerateBatch, GenerateFeed, Locale};
use feedgen_core::impls::{InMemoryChannelRepository, InMemoryFeedRepository, InMemoryLocaleRepository};
use feedgen_core::observability::BusCounts;
use feedgen_core::ports::{FeedRepository, IdGenerator, SystemClock, UlidGenerator, dispatch_message};
use feedgen_core::queue::{InMemoryBus, MessageQueue, MessageStatus, RetryPolicy};
use feedgen_core::typed::{FeedTypeRegistry, Message};

use crate::cli::{RunArgs, ValidateArgs};
use crate::demo::{CATALOG_FEED_TYPE, CatalogFeedType, CatalogProvider};

/// Feed type code nobody registers; used by `--with-broken-feed`.
const UNREGISTERED_FEED_TYPE: &str = "legacy_xml";

#[derive(Debug, Serialize)]
struct RunSummary {
    feeds: Vec<Feed>,
    bus: BusCounts,
    dead_letters: Vec<MessageStatus>,
}

pub async fn run(args: &RunArgs, config: &FeedgenConfig) -> Result<()> {
    let ids = Arc::new(UlidGenerator::new(SystemClock));
    let feeds = Arc::new(InMemoryFeedRepository::new());
    let channels = Arc::new(InMemoryChannelRepository::new());
    let locales = Arc::new(InMemoryLocaleRepository::new());

    let channel = Channel::new(ids.next_ulid().into(), "WEB");
    let locale = Locale::new(ids.next_ulid().into(), "en_US");
    channels.insert(channel.clone()).await;
    locales.insert(locale.clone()).await;

    let mut feed_ids: Vec<FeedId> = Vec::new();
    for n in 1..=args.feeds {
        let feed = Feed::new(ids.next_ulid().into(), format!("catalog-{n}"), CATALOG_FEED_TYPE);
        feed_ids.push(feed.id);
        feeds.insert(feed).await;
    }
    if args.with_broken_feed {
        let feed = Feed::new(ids.next_ulid().into(), "legacy-export", UNREGISTERED_FEED_TYPE);
        feed_ids.push(feed.id);
        feeds.insert(feed).await;
    }

    let mut feed_types = FeedTypeRegistry::new();
    feed_types.register(Arc::new(CatalogFeedType::new(CatalogProvider::new(
        args.products,
        args.batch_size,
    ))))?;
    info!(feed_types = ?feed_types.codes(), "feed types registered");

    let bus = Arc::new(InMemoryBus::new(
        RetryPolicy::from(&config.bus),
        ids.clone(),
        Arc::new(SystemClock),
    ));

    let app = AppBuilder::new()
        .register::<GenerateFeed, _>(GenerateFeedHandler::new(
            feeds.clone(),
            channels,
            locales,
            Arc::new(feed_types),
            bus.clone(),
        ))?
        .register::<GenerateBatch, _>(GenerateBatchHandler::new(feeds.clone()))?
        .expect_messages(&[GenerateFeed::NAME, GenerateBatch::NAME])
        .build()?;
    info!(messages = ?app.registry().registered_names(), "handlers registered");

    for feed_id in &feed_ids {
        feeds.set_state(*feed_id, FeedState::Processing).await?;
        let message_id = dispatch_message(
            bus.as_ref(),
            &GenerateFeed::new(*feed_id, channel.id, locale.id),
        )
        .await?;
        info!(%feed_id, %message_id, "feed generation requested");
    }

    let workers = WorkerGroup::spawn(config.worker.count, bus.clone(), Arc::new(app));
    let timeout = Duration::from_secs(args.timeout_secs);
    let drained = tokio::select! {
        drained = tokio::time::timeout(timeout, wait_until_idle(&bus)) => drained.is_ok(),
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, shutting down workers");
            false
        }
    };
    workers.shutdown_and_join().await;

    let mut all_feeds = feeds.all().await;
    all_feeds.sort_by(|a, b| a.code.cmp(&b.code));
    for feed in &all_feeds {
        info!(
            feed = %feed.code,
            state = ?feed.state,
            batches = feed.batches,
            finished = feed.finished_batches,
            "feed summary"
        );
    }

    let summary = RunSummary {
        feeds: all_feeds,
        bus: bus.counts_by_state().await,
        dead_letters: bus.dead_letters().await,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to render summary")?
    );

    if !drained {
        bail!("bus did not drain within {}s", args.timeout_secs);
    }
    Ok(())
}

async fn wait_until_idle(bus: &InMemoryBus) {
    loop {
        if bus.counts_by_state().await.is_idle() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

pub fn validate(args: &ValidateArgs) -> Result<()> {
    let config = FeedgenConfig::load(&args.config)
        .with_context(|| format!("invalid configuration: {}", args.config.display()))?;
    info!(path = %args.config.display(), "configuration is valid");
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("failed to render configuration")?
    );
    Ok(())
}
