//! Per-player session log for the current day.
//!
//! Players are kept in the order they were first seen today. A Vec with
//! linear lookup is plenty for the handful of players one server holds.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::Session;

/// All sessions of one player, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSessions {
    pub player: String,
    pub sessions: Vec<Session>,
}

impl PlayerSessions {
    /// Sum of all session lengths, counting open sessions up to `now`.
    pub fn total(&self, now: DateTime<Utc>) -> TimeDelta {
        self.sessions
            .iter()
            .fold(TimeDelta::zero(), |acc, s| acc + s.elapsed(now))
    }

    pub fn open_session(&self) -> Option<&Session> {
        self.sessions.iter().rev().find(|s| s.is_open())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    players: Vec<PlayerSessions>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
        }
    }

    /// Start a new session for `player`.
    /// If the player already has an open session, nothing changes.
    pub fn open(&mut self, player: &str, at: DateTime<Utc>) {
        match self.players.iter().position(|p| p.player == player) {
            Some(idx) => {
                let entry = &mut self.players[idx];
                if entry.open_session().is_none() {
                    entry.sessions.push(Session::open(at));
                }
            }
            None => self.players.push(PlayerSessions {
                player: player.to_string(),
                sessions: vec![Session::open(at)],
            }),
        }
    }

    /// Close the most recent open session of `player`.
    /// Returns false when there was none to close.
    pub fn close_latest(&mut self, player: &str, at: DateTime<Utc>) -> bool {
        let Some(entry) = self.players.iter_mut().find(|p| p.player == player) else {
            return false;
        };
        match entry.sessions.iter_mut().rev().find(|s| s.is_open()) {
            Some(session) => {
                session.close(at);
                true
            }
            None => false,
        }
    }

    /// Close every open session. Returns how many were closed.
    pub fn close_all(&mut self, at: DateTime<Utc>) -> usize {
        let mut closed = 0;
        for session in self
            .players
            .iter_mut()
            .flat_map(|p| p.sessions.iter_mut())
            .filter(|s| s.is_open())
        {
            session.close(at);
            closed += 1;
        }
        closed
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn get(&self, player: &str) -> Option<&PlayerSessions> {
        self.players.iter().find(|p| p.player == player)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerSessions> {
        self.players.iter()
    }

    pub fn open_count(&self, player: &str) -> usize {
        self.get(player)
            .map(|p| p.sessions.iter().filter(|s| s.is_open()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
