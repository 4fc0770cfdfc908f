//! Batch drain job and its background schedule
//!
//! One drain cycle opens a single index transaction, pulls entries one at a
//! time until the batch budget is spent or the queue is empty, and always
//! closes the transaction before returning.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::stats::DrainStats;
use crate::content::ContentResolver;
use crate::search::manager::IndexManager;
use crate::search::queue::IndexingQueue;
use crate::search::types::{DrainReport, IndexAction, QueueEntry};

/// Applies queued index actions in bounded batches
pub struct BatchDrainer {
    queue: IndexingQueue,
    manager: Arc<IndexManager>,
    resolver: Arc<dyn ContentResolver>,
    batch_size: usize,
    stats: Arc<DrainStats>,
}

impl BatchDrainer {
    #[must_use]
    pub fn new(
        queue: IndexingQueue,
        manager: Arc<IndexManager>,
        resolver: Arc<dyn ContentResolver>,
        batch_size: usize,
    ) -> Self {
        Self {
            queue,
            manager,
            resolver,
            batch_size: batch_size.max(1),
            stats: Arc::new(DrainStats::new()),
        }
    }

    #[must_use]
    pub fn queue(&self) -> &IndexingQueue {
        &self.queue
    }

    #[must_use]
    pub fn stats(&self) -> &Arc<DrainStats> {
        &self.stats
    }

    /// Drain with the configured batch size
    pub async fn drain_default(&self) -> DrainReport {
        self.drain(self.batch_size).await
    }

    /// Apply up to `max_batch` queued entries.
    ///
    /// Entries whose item can no longer be resolved, or whose store write fails,
    /// are consumed and reported in `errors` without counting toward the batch.
    pub async fn drain(&self, max_batch: usize) -> DrainReport {
        let start = Instant::now();
        let mut report = DrainReport::default();

        let guard = match self.manager.transaction() {
            Ok(guard) => guard,
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to begin index transaction: {e}"));
                self.stats.record(&report);
                return report;
            }
        };

        while report.processed < max_batch {
            let entry = match self.queue.pull_one().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to pull from indexing queue");
                    report.errors.push(format!("failed to pull from queue: {e}"));
                    break;
                }
            };
            self.apply(entry, &mut report);
        }

        if let Err(e) = guard.finish() {
            report
                .errors
                .push(format!("failed to commit index transaction: {e}"));
        }

        self.stats.record(&report);
        tracing::debug!(
            processed = report.processed,
            errors = report.errors.len(),
            duration_ms = start.elapsed().as_millis(),
            "Drain cycle finished"
        );
        report
    }

    fn apply(&self, entry: QueueEntry, report: &mut DrainReport) {
        let QueueEntry { item_id, action } = entry;

        let outcome = match action {
            IndexAction::Delete => self.manager.delete(item_id.as_str()),
            IndexAction::Index => match self.resolver.read(&item_id) {
                Some(item) => self.manager.index(item.as_ref()),
                None => {
                    tracing::debug!(item_id = %item_id, "Queued item no longer resolves");
                    report.errors.push(format!("couldn't index {item_id}"));
                    return;
                }
            },
        };

        match outcome {
            Ok(()) => report.processed += 1,
            Err(e) => {
                tracing::warn!(item_id = %item_id, action = %action, error = %e, "Index action failed");
                report
                    .errors
                    .push(format!("failed to {action} {item_id}: {e}"));
            }
        }
    }

    /// Run `drain_default` every `interval` on the tokio runtime
    pub fn spawn(self: Arc<Self>, interval: Duration) -> DrainSchedule {
        let shutdown = Arc::new(Notify::new());
        let running = Arc::new(AtomicBool::new(true));

        let task_shutdown = shutdown.clone();
        let task_running = running.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = task_shutdown.notified() => break,
                    _ = ticker.tick() => {
                        let report = self.drain_default().await;
                        if !report.is_empty() {
                            tracing::info!(
                                processed = report.processed,
                                errors = report.errors.len(),
                                "Search index drain completed"
                            );
                            for error in &report.errors {
                                tracing::warn!(error = %error, "Search index drain error");
                            }
                        }
                    }
                }
            }

            task_running.store(false, Ordering::Relaxed);
            tracing::debug!("Search index drain schedule stopped");
        });

        DrainSchedule {
            shutdown,
            running,
            handle: Some(handle),
        }
    }
}

/// Handle to a running drain schedule; dropping it stops the schedule
pub struct DrainSchedule {
    shutdown: Arc<Notify>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DrainSchedule {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the schedule and wait for an in-flight cycle to finish
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Drain task terminated abnormally");
        }
    }
}

impl Drop for DrainSchedule {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}
