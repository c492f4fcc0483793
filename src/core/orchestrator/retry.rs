//! Deferred retry scheduling
//!
//! Each slot holds at most one pending retry. Scheduling into an occupied
//! slot aborts the earlier timer first, so a stale retry never fires after
//! the request it belonged to has been superseded.

use super::types::RequestKey;
use crate::config::EndpointKey;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// One consumer-facing lookup line: routes per endpoint, or suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum RetrySlot {
    Route(EndpointKey),
    Suggest,
}

struct PendingRetry {
    generation: u64,
    key: RequestKey,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub(super) struct RetryScheduler {
    next_generation: AtomicU64,
    pending: Mutex<HashMap<RetrySlot, PendingRetry>>,
}

impl RetryScheduler {
    /// Run `task` after `delay`, replacing whatever was pending in `slot`
    ///
    /// `task` receives the generation it runs under and must call
    /// [`RetryScheduler::claim`] before doing any work.
    pub(super) fn schedule<F>(&self, slot: RetrySlot, key: RequestKey, delay: Duration, task: F)
    where
        F: FnOnce(u64) -> BoxFuture<'static, ()>,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let future = task(generation);

        // Hold the lock across spawn so the task cannot claim before it is registered
        let mut pending = self.pending.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            future.await;
        });

        if let Some(previous) = pending.insert(
            slot,
            PendingRetry {
                generation,
                key,
                handle,
            },
        ) {
            debug!("Replacing pending retry in {:?}", slot);
            previous.handle.abort();
        }
    }

    /// Take ownership of a fired retry; `false` means it was superseded
    pub(super) fn claim(&self, slot: RetrySlot, generation: u64) -> bool {
        let mut pending = self.pending.lock();
        match pending.get(&slot) {
            Some(entry) if entry.generation == generation => {
                pending.remove(&slot);
                true
            }
            _ => false,
        }
    }

    /// Abort the pending retry in `slot` unless it is for `key`
    pub(super) fn supersede(&self, slot: RetrySlot, key: &RequestKey) {
        let mut pending = self.pending.lock();
        if pending.get(&slot).is_some_and(|entry| &entry.key != key) {
            if let Some(entry) = pending.remove(&slot) {
                debug!("Cancelled superseded retry in {:?}", slot);
                entry.handle.abort();
            }
        }
    }

    /// Abort the pending retry in `slot`, if any
    pub(super) fn cancel(&self, slot: RetrySlot) {
        if let Some(entry) = self.pending.lock().remove(&slot) {
            entry.handle.abort();
        }
    }

    /// Abort every pending retry
    pub(super) fn cancel_all(&self) {
        for (_, entry) in self.pending.lock().drain() {
            entry.handle.abort();
        }
    }

    pub(super) fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl std::fmt::Debug for RetryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}
