use async_trait::async_trait;

use crate::domain::{Feed, FeedError, FeedId, FeedState};

/// Store of feeds.
///
/// Counter updates must be atomic on the store side: concurrent generations
/// of different batches update the same feed, so implementations may not
/// read the feed, add, and write it back across two calls.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    async fn find_by_id(&self, id: FeedId) -> Result<Option<Feed>, FeedError>;

    /// Add `delta` to the expected batch count.
    async fn increment_batches(&self, id: FeedId, delta: u32) -> Result<(), FeedError>;

    /// Record one finished batch and return the updated feed.
    async fn increment_finished_batches(&self, id: FeedId) -> Result<Feed, FeedError>;

    /// Move the feed to `state`. Fails with `Unrecoverable` on a transition
    /// `FeedState::can_transition_to` rejects.
    async fn set_state(&self, id: FeedId, state: FeedState) -> Result<(), FeedError>;
}
