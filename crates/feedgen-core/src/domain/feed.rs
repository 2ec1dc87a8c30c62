//! Feed entity and its processing state.

use serde::{Deserialize, Serialize};

use super::ids::FeedId;

/// Feed processing state.
///
/// State transitions:
/// - Unprocessed -> Processing -> Ready
/// - Processing -> Error
/// - Ready | Error -> Processing (regeneration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    /// Never generated.
    Unprocessed,

    /// Batches have been (or are being) fanned out.
    Processing,

    /// Every expected batch has finished.
    Ready,

    /// A generation message for the feed was dead-lettered.
    Error,
}

impl FeedState {
    pub fn can_transition_to(self, next: FeedState) -> bool {
        use FeedState::*;
        matches!(
            (self, next),
            (Unprocessed, Processing)
                | (Processing, Ready)
                | (Processing, Error)
                | (Ready, Processing)
                | (Error, Processing)
        )
    }
}

/// A configured feed export.
///
/// `batches` is the number of batches the generation expects; `finished_batches`
/// is advanced as each `GenerateBatch` completes. Both are only mutated through
/// the feed repository's atomic increments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: FeedId,
    pub code: String,

    /// Code of the feed type (key into the feed type registry).
    pub feed_type: String,

    pub enabled: bool,
    pub state: FeedState,
    pub batches: u32,
    pub finished_batches: u32,
}

impl Feed {
    pub fn new(id: FeedId, code: impl Into<String>, feed_type: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            feed_type: feed_type.into(),
            enabled: true,
            state: FeedState::Unprocessed,
            batches: 0,
            finished_batches: 0,
        }
    }

    pub fn feed_type(&self) -> &str {
        &self.feed_type
    }

    /// True once at least one batch was expected and all of them have finished.
    pub fn is_complete(&self) -> bool {
        self.batches > 0 && self.finished_batches >= self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ulid::Ulid;

    fn feed() -> Feed {
        Feed::new(FeedId::from_ulid(Ulid::new()), "google", "google_shopping")
    }

    #[test]
    fn new_feed_is_unprocessed() {
        let feed = feed();
        assert_eq!(feed.state, FeedState::Unprocessed);
        assert_eq!(feed.batches, 0);
        assert!(!feed.is_complete());
    }

    #[rstest]
    #[case::none_finished(3, 0, false)]
    #[case::partially_finished(3, 2, false)]
    #[case::all_finished(3, 3, true)]
    #[case::no_batches_expected(0, 0, false)]
    fn completion(#[case] batches: u32, #[case] finished: u32, #[case] expected: bool) {
        let mut feed = feed();
        feed.batches = batches;
        feed.finished_batches = finished;
        assert_eq!(feed.is_complete(), expected);
    }

    #[rstest]
    #[case(FeedState::Unprocessed, FeedState::Processing, true)]
    #[case(FeedState::Processing, FeedState::Ready, true)]
    #[case(FeedState::Processing, FeedState::Error, true)]
    #[case(FeedState::Ready, FeedState::Processing, true)]
    #[case(FeedState::Unprocessed, FeedState::Ready, false)]
    #[case(FeedState::Ready, FeedState::Error, false)]
    fn transitions(#[case] from: FeedState, #[case] to: FeedState, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }
}
