//! In-memory command bus.

use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

use super::{MessageLease, MessageQueue, MessageRecord, MessageState, MessageStatus, RetryPolicy};
use crate::domain::{Envelope, FeedError, MessageId};
use crate::observability::BusCounts;
use crate::ports::{Clock, CommandBus, IdGenerator};

/// Retry entry; reversed ordering turns `BinaryHeap` into a min-heap on time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledMessage {
    next_run_at: Instant,
    id: MessageId,
}

impl PartialOrd for ScheduledMessage {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledMessage {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.next_run_at.cmp(&self.next_run_at)
    }
}

struct BusState {
    records: HashMap<MessageId, MessageRecord>,

    /// Ready for lease, in dispatch order.
    ready: VecDeque<MessageId>,

    /// Waiting for their backoff to elapse.
    scheduled: BinaryHeap<ScheduledMessage>,
}

impl BusState {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            ready: VecDeque::new(),
            scheduled: BinaryHeap::new(),
        }
    }

    fn promote_scheduled(&mut self, clock: &dyn Clock) {
        let now = Instant::now();
        while let Some(entry) = self.scheduled.peek() {
            if entry.next_run_at > now {
                break;
            }
            let Some(entry) = self.scheduled.pop() else {
                break;
            };
            if let Some(record) = self.records.get_mut(&entry.id)
                && record.state == MessageState::RetryScheduled
            {
                record.requeue(clock.now());
                self.ready.push_back(entry.id);
            }
        }
    }

    fn counts_by_state(&self) -> BusCounts {
        let mut counts = BusCounts::default();
        for record in self.records.values() {
            match record.state {
                MessageState::Queued => counts.queued += 1,
                MessageState::Running => counts.running += 1,
                MessageState::Succeeded => counts.succeeded += 1,
                MessageState::RetryScheduled => counts.retry_scheduled += 1,
                MessageState::Dead => counts.dead += 1,
            }
        }
        counts
    }
}

struct Shared {
    state: Mutex<BusState>,
    notify: Notify,
    retry_policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

/// Command bus that keeps every message in memory.
///
/// Producers call `CommandBus::dispatch`; workers call `MessageQueue::lease`.
/// Messages are delivered in dispatch order; failed messages come back after
/// their backoff.
pub struct InMemoryBus {
    shared: Arc<Shared>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryBus {
    pub fn new(retry_policy: RetryPolicy, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(BusState::new()),
                notify: Notify::new(),
                retry_policy,
                clock,
            }),
            ids,
        }
    }

    pub async fn status(&self, id: MessageId) -> Option<MessageStatus> {
        let state = self.shared.state.lock().await;
        state.records.get(&id).map(MessageRecord::status)
    }

    /// Every message that was dead-lettered.
    pub async fn dead_letters(&self) -> Vec<MessageStatus> {
        let state = self.shared.state.lock().await;
        let mut dead: Vec<MessageStatus> = state
            .records
            .values()
            .filter(|r| r.state == MessageState::Dead)
            .map(MessageRecord::status)
            .collect();
        dead.sort_by_key(|s| s.created_at);
        dead
    }
}

#[async_trait]
impl CommandBus for InMemoryBus {
    async fn dispatch(&self, envelope: Envelope) -> Result<MessageId, FeedError> {
        let id: MessageId = self.ids.next_ulid().into();
        {
            let mut state = self.shared.state.lock().await;
            debug!(message_id = %id, name = envelope.name(), "message dispatched");
            let record = MessageRecord::new(id, envelope, self.shared.clock.now());
            state.records.insert(id, record);
            state.ready.push_back(id);
        }
        self.shared.notify.notify_one();
        Ok(id)
    }
}

#[async_trait]
impl MessageQueue for InMemoryBus {
    async fn lease(&self) -> Box<dyn MessageLease> {
        loop {
            let next_wake = {
                let mut state = self.shared.state.lock().await;
                state.promote_scheduled(self.shared.clock.as_ref());

                while let Some(id) = state.ready.pop_front() {
                    let Some(record) = state.records.get_mut(&id) else {
                        continue;
                    };
                    record.start_attempt(self.shared.clock.now());
                    return Box::new(InMemoryLease {
                        id,
                        envelope: record.envelope.clone(),
                        attempt: record.attempts,
                        shared: Arc::clone(&self.shared),
                    });
                }

                state.scheduled.peek().map(|entry| entry.next_run_at)
            };

            match next_wake {
                Some(wake_at) => {
                    tokio::select! {
                        _ = self.shared.notify.notified() => {},
                        _ = tokio::time::sleep_until(wake_at.into()) => {},
                    }
                }
                None => self.shared.notify.notified().await,
            }
        }
    }

    async fn counts_by_state(&self) -> BusCounts {
        self.shared.state.lock().await.counts_by_state()
    }
}

struct InMemoryLease {
    id: MessageId,
    envelope: Envelope,
    attempt: u32,
    shared: Arc<Shared>,
}

#[async_trait]
impl MessageLease for InMemoryLease {
    fn message_id(&self) -> MessageId {
        self.id
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn attempt(&self) -> u32 {
        self.attempt
    }

    async fn ack(self: Box<Self>) -> Result<(), FeedError> {
        let mut state = self.shared.state.lock().await;
        let record = state
            .records
            .get_mut(&self.id)
            .ok_or_else(|| FeedError::Storage(format!("message {} vanished", self.id)))?;
        record.mark_succeeded(self.shared.clock.now());
        Ok(())
    }

    async fn fail(self: Box<Self>, error: &FeedError) -> Result<MessageState, FeedError> {
        let outcome = {
            let mut state = self.shared.state.lock().await;
            let now = self.shared.clock.now();
            let record = state
                .records
                .get_mut(&self.id)
                .ok_or_else(|| FeedError::Storage(format!("message {} vanished", self.id)))?;

            if !error.is_retryable() {
                warn!(message_id = %self.id, error = %error, "non-retryable failure, dead-lettering");
                record.mark_dead(error.to_string(), now);
                MessageState::Dead
            } else if self.shared.retry_policy.attempts_exhausted(record.attempts) {
                warn!(
                    message_id = %self.id,
                    attempts = record.attempts,
                    error = %error,
                    "retry budget exhausted, dead-lettering"
                );
                record.mark_dead(error.to_string(), now);
                MessageState::Dead
            } else {
                let delay = self.shared.retry_policy.next_delay(record.attempts);
                let next_run_at = Instant::now() + delay;
                debug!(
                    message_id = %self.id,
                    attempts = record.attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retry scheduled"
                );
                record.schedule_retry(next_run_at, error.to_string(), now);
                state.scheduled.push(ScheduledMessage {
                    next_run_at,
                    id: self.id,
                });
                MessageState::RetryScheduled
            }
        };

        // wake a waiter so it re-arms its timer on the new deadline
        if outcome == MessageState::RetryScheduled {
            self.shared.notify.notify_one();
        }
        Ok(outcome)
    }
}
