//! Latest-view publication shared between the tick driver and the front ends.
//!
//! The driver swaps in a whole new `Arc<StatusView>` per tick. Readers clone
//! the `Arc` out from under a short read lock, so they never see a half-built
//! view and never wait on a tick in progress.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;

use crate::models::StatusView;

struct Inner {
    view: watch::Sender<Arc<StatusView>>,
    became_online: AtomicBool,
    published: AtomicU64,
}

/// Cheap to clone; all clones share the same board.
#[derive(Clone)]
pub struct StatusBoard {
    inner: Arc<Inner>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (view, _) = watch::channel(Arc::new(StatusView::not_started()));
        Self {
            inner: Arc::new(Inner {
                view,
                became_online: AtomicBool::new(false),
                published: AtomicU64::new(0),
            }),
        }
    }

    /// The most recently published view, or the not-started view.
    pub fn latest(&self) -> Arc<StatusView> {
        self.inner.view.borrow().clone()
    }

    /// Replace the published view.
    pub fn publish(&self, view: StatusView) {
        if view.became_online {
            self.inner.became_online.store(true, Ordering::Release);
        }
        self.inner.view.send_replace(Arc::new(view));
        self.inner.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Wakes whenever a new view is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StatusView>> {
        self.inner.view.subscribe()
    }

    /// True exactly once after each transition into `Online`.
    pub fn take_became_online(&self) -> bool {
        self.inner.became_online.swap(false, Ordering::AcqRel)
    }

    /// Number of views published so far.
    pub fn ticks(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
