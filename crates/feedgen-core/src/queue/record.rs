//! Message record: envelope + delivery metadata.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::MessageState;
use crate::domain::{Envelope, MessageId};

/// Single source of truth for one message on the bus. The ready and scheduled
/// queues only hold ids.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: MessageId,
    pub envelope: Envelope,
    pub state: MessageState,

    /// Attempts made so far, including the current one while Running.
    pub attempts: u32,

    pub last_error: Option<String>,

    /// When a RetryScheduled message becomes eligible again.
    pub next_run_at: Option<Instant>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(id: MessageId, envelope: Envelope, now: DateTime<Utc>) -> Self {
        Self {
            id,
            envelope,
            state: MessageState::Queued,
            attempts: 0,
            last_error: None,
            next_run_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn start_attempt(&mut self, now: DateTime<Utc>) {
        self.state = MessageState::Running;
        self.attempts += 1;
        self.updated_at = now;
    }

    pub fn mark_succeeded(&mut self, now: DateTime<Utc>) {
        self.state = MessageState::Succeeded;
        self.updated_at = now;
    }

    pub fn mark_dead(&mut self, error: String, now: DateTime<Utc>) {
        self.state = MessageState::Dead;
        self.last_error = Some(error);
        self.updated_at = now;
    }

    pub fn schedule_retry(&mut self, next_run_at: Instant, error: String, now: DateTime<Utc>) {
        self.state = MessageState::RetryScheduled;
        self.next_run_at = Some(next_run_at);
        self.last_error = Some(error);
        self.updated_at = now;
    }

    /// RetryScheduled -> Queued.
    pub fn requeue(&mut self, now: DateTime<Utc>) {
        self.state = MessageState::Queued;
        self.next_run_at = None;
        self.updated_at = now;
    }

    pub fn status(&self) -> MessageStatus {
        MessageStatus {
            id: self.id,
            name: self.envelope.name().to_string(),
            state: self.state,
            attempts: self.attempts,
            last_error: self.last_error.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Serializable snapshot of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageStatus {
    pub id: MessageId,
    pub name: String,
    pub state: MessageState,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
