use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{Feed, FeedError, FeedId, FeedState};
use crate::ports::FeedRepository;

/// Feed store backed by a `HashMap`.
///
/// Every mutation runs under the single lock, so increments are atomic with
/// respect to each other.
#[derive(Default)]
pub struct InMemoryFeedRepository {
    feeds: Mutex<HashMap<FeedId, Feed>>,
}

impl InMemoryFeedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, feed: Feed) {
        self.feeds.lock().await.insert(feed.id, feed);
    }

    pub async fn all(&self) -> Vec<Feed> {
        self.feeds.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl FeedRepository for InMemoryFeedRepository {
    async fn find_by_id(&self, id: FeedId) -> Result<Option<Feed>, FeedError> {
        Ok(self.feeds.lock().await.get(&id).cloned())
    }

    async fn increment_batches(&self, id: FeedId, delta: u32) -> Result<(), FeedError> {
        let mut feeds = self.feeds.lock().await;
        let feed = feeds
            .get_mut(&id)
            .ok_or_else(|| FeedError::not_found("Feed", id))?;
        feed.batches = feed.batches.saturating_add(delta);
        debug!(feed_id = %id, delta, batches = feed.batches, "incremented expected batches");
        Ok(())
    }

    async fn increment_finished_batches(&self, id: FeedId) -> Result<Feed, FeedError> {
        let mut feeds = self.feeds.lock().await;
        let feed = feeds
            .get_mut(&id)
            .ok_or_else(|| FeedError::not_found("Feed", id))?;
        feed.finished_batches = feed.finished_batches.saturating_add(1);
        Ok(feed.clone())
    }

    async fn set_state(&self, id: FeedId, state: FeedState) -> Result<(), FeedError> {
        let mut feeds = self.feeds.lock().await;
        let feed = feeds
            .get_mut(&id)
            .ok_or_else(|| FeedError::not_found("Feed", id))?;
        if !feed.state.can_transition_to(state) {
            return Err(FeedError::Unrecoverable(format!(
                "feed {id} cannot move from {:?} to {state:?}",
                feed.state
            )));
        }
        // regeneration starts a fresh count
        if state == FeedState::Processing {
            feed.batches = 0;
            feed.finished_batches = 0;
        }
        feed.state = state;
        Ok(())
    }
}
