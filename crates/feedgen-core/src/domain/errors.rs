//! Error taxonomy shared by handlers, ports and the bus.
//!
//! Every failure carries an `ErrorKind` so the bus can decide whether a message
//! is worth retrying. Handlers never make that decision themselves; they only
//! pick the variant.

use thiserror::Error;

/// Operational classification of an error.
///
/// - Transient: may succeed on retry
/// - Permanent: retrying is pointless (configuration or payload problem)
/// - Infrastructure: store / bus failure, retried like a transient error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A feed, channel or locale id did not resolve.
    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    /// The message can never be handled successfully; the text is shown as-is.
    #[error("{0}")]
    Unrecoverable(String),

    /// Raised by a data provider while counting or enumerating batches.
    #[error("data provider failed: {0}")]
    Provider(String),

    /// The command bus rejected an outbound message.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// A message payload could not be encoded or decoded.
    #[error("payload codec failed: {0}")]
    Decode(String),

    /// A repository operation failed.
    #[error("storage failed: {0}")]
    Storage(String),
}

impl FeedError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::NotFound { .. } | FeedError::Provider(_) => ErrorKind::Transient,
            FeedError::Unrecoverable(_) | FeedError::Decode(_) => ErrorKind::Permanent,
            FeedError::Dispatch(_) | FeedError::Storage(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() != ErrorKind::Permanent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn unrecoverable_message_is_verbatim() {
        let err = FeedError::Unrecoverable(r#"Feed type with code "google" does not exist"#.into());
        assert_eq!(err.to_string(), r#"Feed type with code "google" does not exist"#);
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = FeedError::not_found("Feed", "feed-42");
        assert_eq!(err.to_string(), "Feed with id feed-42 does not exist");
    }

    #[rstest]
    #[case::not_found(FeedError::not_found("Locale", "x"), true)]
    #[case::provider(FeedError::Provider("timeout".into()), true)]
    #[case::dispatch(FeedError::Dispatch("broker down".into()), true)]
    #[case::storage(FeedError::Storage("deadlock".into()), true)]
    #[case::unrecoverable(FeedError::Unrecoverable("bad config".into()), false)]
    #[case::decode(FeedError::Decode("missing field".into()), false)]
    fn retryability(#[case] err: FeedError, #[case] retryable: bool) {
        assert_eq!(err.is_retryable(), retryable);
    }
}
