//! GenerateBatchHandler - tracks batch progress per feed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{FeedError, FeedId, FeedState, GenerateBatch};
use crate::ports::FeedRepository;
use crate::typed::MessageHandler;

/// Records a finished batch and marks the feed `Ready` once every expected
/// batch has finished. Rendering the batch itself is left to the deployment.
pub struct GenerateBatchHandler {
    feeds: Arc<dyn FeedRepository>,
}

impl GenerateBatchHandler {
    pub fn new(feeds: Arc<dyn FeedRepository>) -> Self {
        Self { feeds }
    }
}

#[async_trait]
impl MessageHandler<GenerateBatch> for GenerateBatchHandler {
    async fn handle(&self, message: GenerateBatch) -> Result<(), FeedError> {
        let feed = self.feeds.increment_finished_batches(message.feed.id).await?;
        debug!(
            feed_id = %feed.id,
            channel = %message.channel.code,
            locale = %message.locale.code,
            finished = feed.finished_batches,
            expected = feed.batches,
            batch = %message.batch.payload(),
            "batch finished"
        );

        if feed.is_complete() && feed.state == FeedState::Processing {
            self.feeds.set_state(feed.id, FeedState::Ready).await?;
            info!(feed_id = %feed.id, feed = %feed.code, batches = feed.batches, "feed ready");
        }
        Ok(())
    }

    async fn on_dead_letter(&self, message: GenerateBatch, error: &FeedError) -> Result<(), FeedError> {
        mark_feed_failed(self.feeds.as_ref(), message.feed.id, error).await
    }
}

/// Move a feed to `Error` after one of its generation messages was
/// dead-lettered. Feeds that are gone or not `Processing` are left alone.
pub(crate) async fn mark_feed_failed(
    feeds: &dyn FeedRepository,
    feed_id: FeedId,
    error: &FeedError,
) -> Result<(), FeedError> {
    match feeds.find_by_id(feed_id).await? {
        Some(feed) if feed.state.can_transition_to(FeedState::Error) => {
            feeds.set_state(feed_id, FeedState::Error).await?;
            warn!(%feed_id, feed = %feed.code, error = %error, "feed generation failed");
        }
        Some(feed) => {
            debug!(%feed_id, state = ?feed.state, "feed not processing, state kept");
        }
        None => {
            debug!(%feed_id, "dead-lettered message for unknown feed");
        }
    }
    Ok(())
}
