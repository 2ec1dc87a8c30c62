//! FeedType - a named strategy that supplies a data provider.
//!
//! Feed types are registered once at process start; the registry is then
//! shared read-only (`Arc<FeedTypeRegistry>`) by every handler.

use std::collections::HashMap;
use std::sync::Arc;

use super::registry::RegistryError;
use crate::ports::DataProvider;

/// A feed type, e.g. `google_shopping`.
pub trait FeedType: Send + Sync {
    /// Code stored on `Feed::feed_type`.
    fn code(&self) -> &str;

    fn data_provider(&self) -> Arc<dyn DataProvider>;
}

#[derive(Default)]
pub struct FeedTypeRegistry {
    feed_types: HashMap<String, Arc<dyn FeedType>>,
}

impl FeedTypeRegistry {
    pub fn new() -> Self {
        Self {
            feed_types: HashMap::new(),
        }
    }

    pub fn register(&mut self, feed_type: Arc<dyn FeedType>) -> Result<(), RegistryError> {
        let code = feed_type.code().to_string();
        if self.feed_types.contains_key(&code) {
            return Err(RegistryError::DuplicateFeedType(code));
        }
        self.feed_types.insert(code, feed_type);
        Ok(())
    }

    pub fn has(&self, code: &str) -> bool {
        self.feed_types.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<Arc<dyn FeedType>> {
        self.feed_types.get(code).cloned()
    }

    pub fn codes(&self) -> Vec<String> {
        self.feed_types.keys().cloned().collect()
    }
}
