//! The per-record embedding loop — retry policy and cancellation.
//!
//! Records are embedded strictly one at a time in assembler order; there is
//! no batching and no concurrency. A failed call never advances the cursor:
//! the same record is resubmitted after a fixed delay until it succeeds, the
//! attempt budget runs out, or the run is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::corpus::Record;
use crate::embedding::EmbeddingProvider;

/// Retry policy for embedding calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Fixed wait between attempts.
    pub delay: Duration,
    /// Maximum attempts per record; `None` retries until success.
    pub max_attempts: Option<u64>,
}

impl RetryPolicy {
    /// Build from config values, where `max_attempts == 0` means unbounded.
    pub fn from_config(config: &crate::config::EmbeddingConfig) -> Self {
        Self {
            delay: Duration::from_secs(config.retry_delay_secs),
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
        }
    }
}

/// Cooperative cancellation handle for the embedding loop.
///
/// Clones share one flag. `cancel` also wakes a loop parked in its retry
/// delay, so an interrupted run stops promptly instead of sleeping out the
/// full delay.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            self.inner.notify.notified().await;
        }
    }
}

/// Embeds an ordered record sequence one record at a time.
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    retry: RetryPolicy,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Embed one record, retrying per the policy until success.
    ///
    /// A failed call does not advance: the same text is resubmitted after
    /// the fixed delay. With an unbounded policy the only exits are success
    /// and cancellation — a permanently down service shows up as repeated
    /// `warn` logs, not as a returned error.
    pub async fn embed_record(&self, record: &Record, cancel: &CancelToken) -> Result<Vec<f32>> {
        let mut attempt: u64 = 0;
        loop {
            anyhow::ensure!(!cancel.is_cancelled(), "embedding run cancelled");
            attempt += 1;

            match self.provider.embed(&record.text).await {
                Ok(vector) => {
                    debug!(label = %record.label, attempt, "record embedded");
                    return Ok(vector);
                }
                Err(err) => {
                    if let Some(max) = self.retry.max_attempts {
                        if attempt >= max {
                            return Err(err.context(format!(
                                "embedding failed after {attempt} attempts for a record from source '{}'",
                                record.label
                            )));
                        }
                    }
                    warn!(
                        label = %record.label,
                        attempt,
                        delay_secs = self.retry.delay.as_secs(),
                        error = %err,
                        "embedding call failed, retrying"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(self.retry.delay) => {}
                        _ = cancel.cancelled() => {}
                    }
                }
            }
        }
    }

    /// Embed all records in order, one at a time.
    ///
    /// On success the returned sequence has exactly the input's length and
    /// order: position `i` holds record `i`'s vector. `progress` is invoked
    /// with the completed count after each record.
    pub async fn embed_records(
        &self,
        records: &[Record],
        cancel: &CancelToken,
        mut progress: impl FnMut(usize),
    ) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(records.len());
        for record in records {
            vectors.push(self.embed_record(record, cancel).await?);
            progress(vectors.len());
        }
        Ok(vectors)
    }
}
