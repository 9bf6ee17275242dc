//! Periodic driver: poll, tick, publish.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::board::StatusBoard;
use crate::clock::Clock;
use crate::source::StatusSource;
use crate::tracker::SessionTracker;

/// Outcome of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Published,
    /// The poll failed; state and the published view were left alone.
    Skipped,
}

/// Owns the tracker, so ticks are strictly sequential.
pub struct Monitor {
    tracker: SessionTracker,
    source: Arc<dyn StatusSource>,
    clock: Arc<dyn Clock>,
    board: StatusBoard,
}

impl Monitor {
    pub fn new(
        tracker: SessionTracker,
        source: Arc<dyn StatusSource>,
        clock: Arc<dyn Clock>,
        board: StatusBoard,
    ) -> Self {
        Self {
            tracker,
            source,
            clock,
            board,
        }
    }

    pub async fn poll_once(&mut self) -> TickResult {
        let snapshot = match self.source.poll().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "status poll failed, keeping last view");
                return TickResult::Skipped;
            }
        };

        let now = self.clock.now();
        let view = self.tracker.tick(&snapshot, now);
        debug!(
            status = view.status.label(),
            players = view.players.len(),
            "tick"
        );
        self.board.publish(view);
        TickResult::Published
    }

    /// Tick every `period` until `shutdown` resolves.
    pub async fn run(mut self, period: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(period_secs = period.as_secs(), "status monitor started");
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
            }
        }
        info!("status monitor stopped");
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }
}
