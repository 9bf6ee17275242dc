//! Turns successive snapshots into per-player sessions and a rendered view.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::clock::ReferenceZone;
use crate::models::{PlayerActivity, ServerStatus, SessionSpan, Snapshot, StatusView};
use crate::sessions::SessionLog;

/// Single-writer tracking state. Only the tick driver should hold this.
#[derive(Debug)]
pub struct SessionTracker {
    zone: ReferenceZone,
    online_since: Option<DateTime<Utc>>,
    last_players: BTreeSet<String>,
    last_status: Option<ServerStatus>,
    last_reset_day: Option<NaiveDate>,
    sessions: SessionLog,
}

impl SessionTracker {
    pub fn new(zone: ReferenceZone) -> Self {
        Self {
            zone,
            online_since: None,
            last_players: BTreeSet::new(),
            last_status: None,
            last_reset_day: None,
            sessions: SessionLog::new(),
        }
    }

    /// Apply one snapshot observed at `now` and render the resulting view.
    pub fn tick(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> StatusView {
        self.reset_if_new_day(now);

        let status = snapshot.status;
        let uptime = if status.is_online() {
            let since = *self.online_since.get_or_insert(now);
            Some((now - since).max(chrono::TimeDelta::zero()))
        } else {
            self.online_since = None;
            None
        };

        self.reconcile(&snapshot.players, now);

        let became_online = status.is_online() && self.last_status != Some(ServerStatus::Online);
        if became_online {
            info!(server = %snapshot.name, "server came online");
        }
        self.last_status = Some(status);

        StatusView {
            status,
            status_text: status.label().to_string(),
            color: status.color(),
            server_name: snapshot.name.clone(),
            players: snapshot.players.iter().cloned().collect(),
            sessions: self.render_sessions(now),
            uptime,
            last_update: Some(now),
            became_online,
        }
    }

    /// Close everything and start an empty log once the reference-zone date moves forward.
    fn reset_if_new_day(&mut self, now: DateTime<Utc>) {
        let today = self.zone.date_of(now);
        match self.last_reset_day {
            None => self.last_reset_day = Some(today),
            Some(last) if today > last => {
                let closed = self.sessions.close_all(now);
                info!(%today, closed, "midnight reset");
                self.sessions.clear();
                self.last_reset_day = Some(today);
            }
            Some(_) => {}
        }
    }

    fn reconcile(&mut self, current: &BTreeSet<String>, now: DateTime<Utc>) {
        for player in current.difference(&self.last_players) {
            debug!(%player, "player joined");
            self.sessions.open(player, now);
        }
        for player in self.last_players.difference(current) {
            if self.sessions.close_latest(player, now) {
                debug!(%player, "player left");
            } else {
                // Missed join (or a join before the last reset); nothing to close.
                debug!(%player, "player left without an open session");
            }
        }
        self.last_players = current.clone();
    }

    fn render_sessions(&self, now: DateTime<Utc>) -> Vec<PlayerActivity> {
        self.sessions
            .iter()
            .filter(|p| !p.sessions.is_empty())
            .map(|p| PlayerActivity {
                player: p.player.clone(),
                sessions: p
                    .sessions
                    .iter()
                    .map(|s| SessionSpan {
                        start: s.start,
                        end: s.end,
                        start_local: self.zone.format_hm(s.start),
                        end_local: s.end.map(|end| self.zone.format_hm(end)),
                    })
                    .collect(),
                total: p.total(now),
            })
            .collect()
    }

    pub fn online_since(&self) -> Option<DateTime<Utc>> {
        self.online_since
    }

    pub fn last_players(&self) -> &BTreeSet<String> {
        &self.last_players
    }

    pub fn last_status(&self) -> Option<ServerStatus> {
        self.last_status
    }

    pub fn last_reset_day(&self) -> Option<NaiveDate> {
        self.last_reset_day
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }
}
