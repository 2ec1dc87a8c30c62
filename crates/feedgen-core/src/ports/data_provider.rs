//! DataProvider port - knows how a feed type's data splits into batches.

use async_trait::async_trait;

use crate::domain::{Batch, Channel, FeedError, Locale};

/// Counts and enumerates the batches of work for a channel / locale pair.
///
/// `batch_count` and `batches` are called separately and nothing forces them
/// to agree. The expected batch counter of a feed is driven by `batch_count`,
/// while the number of `GenerateBatch` messages is driven by `batches`.
///
/// Failures should be reported as `FeedError::Provider`; they reach the bus
/// unchanged.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn batch_count(&self, channel: &Channel, locale: &Locale) -> Result<u32, FeedError>;

    /// Batches in the order they must be dispatched.
    async fn batches(&self, channel: &Channel, locale: &Locale) -> Result<Vec<Batch>, FeedError>;
}
