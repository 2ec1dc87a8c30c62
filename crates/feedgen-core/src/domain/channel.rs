//! Channel and locale: read-only context entities looked up by id.

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, LocaleId};

/// A sales / storefront context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub code: String,
}

impl Channel {
    pub fn new(id: ChannelId, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}

/// A language / region context, e.g. `en_US`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub id: LocaleId,
    pub code: String,
}

impl Locale {
    pub fn new(id: LocaleId, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}
