//! In-process queue store

use ahash::AHashMap;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::QueueStore;
use crate::search::errors::SearchResult;
use crate::search::types::QueueEntry;

#[derive(Default)]
struct Pending {
    next_seq: u64,
    by_seq: BTreeMap<u64, QueueEntry>,
    seq_of: AHashMap<String, u64>,
}

/// Non-durable queue store; pending entries are lost when it is dropped
#[derive(Default)]
pub struct MemoryQueueStore {
    pending: Mutex<Pending>,
}

impl MemoryQueueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn put_sync(&self, entry: QueueEntry) {
        let mut pending = self.pending.lock();
        if let Some(&seq) = pending.seq_of.get(&entry.item_id) {
            pending.by_seq.insert(seq, entry);
            return;
        }
        let seq = pending.next_seq;
        pending.next_seq += 1;
        pending.seq_of.insert(entry.item_id.clone(), seq);
        pending.by_seq.insert(seq, entry);
    }

    fn pull_sync(&self) -> Option<QueueEntry> {
        let mut pending = self.pending.lock();
        let (_, entry) = pending.by_seq.pop_first()?;
        pending.seq_of.remove(&entry.item_id);
        Some(entry)
    }
}

impl QueueStore for MemoryQueueStore {
    fn put(&self, entry: QueueEntry) -> BoxFuture<'_, SearchResult<()>> {
        self.put_sync(entry);
        futures::future::ready(Ok(())).boxed()
    }

    fn pull_one(&self) -> BoxFuture<'_, SearchResult<Option<QueueEntry>>> {
        let entry = self.pull_sync();
        futures::future::ready(Ok(entry)).boxed()
    }

    fn len(&self) -> BoxFuture<'_, SearchResult<usize>> {
        let len = self.pending.lock().by_seq.len();
        futures::future::ready(Ok(len)).boxed()
    }
}
