use crossbeam_utils::CachePadded;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts spawned work (static replays, deferred emissions) that has not
/// finished yet. Every task holds a [`Pending`] guard for its lifetime.
#[derive(Debug, Default, Clone)]
pub(crate) struct WaitGroup {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    outstanding: CachePadded<AtomicUsize>,
    idle: Notify,
}

impl WaitGroup {
    pub(crate) fn add(&self) -> Pending {
        self.shared.outstanding.fetch_add(1, Ordering::Relaxed);
        Pending(Arc::clone(&self.shared))
    }

    pub(crate) fn pending(&self) -> usize {
        self.shared.outstanding.load(Ordering::Acquire)
    }

    /// Resolves once no guard is alive.
    pub(crate) async fn wait(&self) {
        loop {
            let mut idle = pin!(self.shared.idle.notified());
            idle.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// Keeps its [`WaitGroup`] busy until dropped.
#[must_use = "the work is only tracked while the guard is alive"]
pub(crate) struct Pending(Arc<Shared>);

impl Drop for Pending {
    fn drop(&mut self) {
        if self.0.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}
