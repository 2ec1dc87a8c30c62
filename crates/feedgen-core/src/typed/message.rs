//! Message trait: binds a wire name to a concrete type.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A message that can travel over the command bus.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct PurgeFeed {
///     feed_id: FeedId,
/// }
///
/// impl Message for PurgeFeed {
///     const NAME: &'static str = "feedgen.feed.purge.v1";
/// }
/// ```
///
/// Naming convention: `{namespace}.{domain}.{action}.v{major}`.
pub trait Message: Serialize + DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;
}
