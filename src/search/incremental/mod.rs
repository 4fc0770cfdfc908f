//! Batched draining of the indexing queue
//!
//! Content mutations are queued rather than indexed inline. A [`BatchDrainer`]
//! pulls a bounded batch, applies every entry through the
//! [`IndexManager`](crate::search::IndexManager) inside a single transaction and
//! reports what happened. [`BatchDrainer::spawn`] runs that on a tokio interval.
//!
//! # Architecture
//!
//! - `service` - The drainer and its background schedule
//! - `stats` - Running totals folded from each `DrainReport`
//!
//! # Example
//!
//! ```ignore
//! let drainer = Arc::new(BatchDrainer::new(queue, manager, resolver, config.batch_size()));
//! let schedule = drainer.clone().spawn(config.drain_interval());
//!
//! // ... later
//! schedule.shutdown().await;
//! ```

mod service;
mod stats;

pub use service::{BatchDrainer, DrainSchedule};
pub use stats::{DrainStats, DrainStatsSnapshot};

#[cfg(test)]
mod tests;
