//! IdGenerator port - id minting.

use ulid::Ulid;

use crate::ports::Clock;

/// Produces fresh ULIDs; callers convert into the id type they need:
///
/// ```ignore
/// let feed_id: FeedId = ids.next_ulid().into();
/// ```
pub trait IdGenerator: Send + Sync {
    fn next_ulid(&self) -> Ulid;
}

/// ULID generator whose timestamp part comes from a `Clock`, so ids minted
/// under a `FixedClock` are time-deterministic.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedId, MessageId};
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn generated_ids_are_unique() {
        let ids = UlidGenerator::new(SystemClock);

        let a: MessageId = ids.next_ulid().into();
        let b: MessageId = ids.next_ulid().into();

        assert_ne!(a, b);
    }

    #[test]
    fn fixed_clock_pins_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let ids = UlidGenerator::new(FixedClock::new(at));

        let a: FeedId = ids.next_ulid().into();
        let b: FeedId = ids.next_ulid().into();

        // random part differs, timestamp part does not
        assert_ne!(a, b);
        assert_eq!(a.as_ulid().timestamp_ms(), at.timestamp_millis() as u64);
        assert_eq!(b.as_ulid().timestamp_ms(), at.timestamp_millis() as u64);
    }
}
