use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::builder::App;
use crate::domain::{Envelope, FeedError};
use crate::queue::{MessageQueue, MessageState};

/// Worker group handle.
/// - `request_shutdown()` stops every worker from taking new leases
/// - `shutdown_and_join()` also waits for in-flight handlers to finish
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn `n` workers consuming `queue`.
    pub fn spawn(n: usize, queue: Arc<dyn MessageQueue>, app: Arc<App>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let joins = (0..n)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let app = Arc::clone(&app);
                let mut rx = shutdown_rx.clone();
                tokio::spawn(async move {
                    worker_loop(worker_id, queue, app, &mut rx).await;
                })
            })
            .collect();

        Self { shutdown_tx, joins }
    }

    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for join in self.joins {
            if let Err(e) = join.await {
                warn!(error = %e, "worker task panicked");
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<dyn MessageQueue>,
    app: Arc<App>,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    debug!(worker_id, "worker started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let lease = tokio::select! {
            changed = shutdown_rx.changed() => {
                // group handle dropped
                if changed.is_err() {
                    break;
                }
                continue;
            }
            lease = queue.lease() => lease,
        };

        // Bus locks are released inside lease(); nothing is held across the handler.
        let envelope = lease.envelope().clone();
        let message_id = lease.message_id();
        let attempt = lease.attempt();

        match execute_catching_panics(&app, &envelope).await {
            Ok(()) => {
                if let Err(e) = lease.ack().await {
                    warn!(worker_id, %message_id, error = %e, "ack failed");
                }
            }
            Err(err) => {
                warn!(
                    worker_id,
                    %message_id,
                    message_name = envelope.name(),
                    attempt,
                    retryable = err.is_retryable(),
                    error = %err,
                    "message handling failed"
                );
                match lease.fail(&err).await {
                    Ok(MessageState::Dead) => {
                        if let Err(e) = app.dead_letter(&envelope, &err).await {
                            warn!(worker_id, %message_id, error = %e, "dead-letter hook failed");
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(worker_id, %message_id, error = %e, "failure report failed");
                    }
                }
            }
        }
    }
    debug!(worker_id, "worker stopped");
}

/// A panicking handler becomes an unrecoverable failure so its lease is still
/// settled.
async fn execute_catching_panics(app: &App, envelope: &Envelope) -> Result<(), FeedError> {
    match AssertUnwindSafe(app.execute(envelope)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let panic_msg = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            error!(message_name = envelope.name(), panic_msg = %panic_msg, "handler panicked");
            Err(FeedError::Unrecoverable(format!("handler panicked: {panic_msg}")))
        }
    }
}
