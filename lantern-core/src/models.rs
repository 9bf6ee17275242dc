use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::clock::format_duration_hm;

/// Rendered in place of an uptime while the server is not online.
pub const NO_UPTIME: &str = "–";

/// Rendered in place of the end time of a session that is still running.
pub const IN_PROGRESS: &str = "…";

/// Server state as reported by the hosting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
  Offline,
  Online,
  Starting,
  Stopping,
  Restarting,
  Unknown,
}

impl ServerStatus {
  /// Map the API's numeric status. Codes we don't track fall back to `Unknown`.
  pub fn from_code(code: i64) -> Self {
    match code {
      0 => Self::Offline,
      1 => Self::Online,
      2 => Self::Starting,
      3 => Self::Stopping,
      4 => Self::Restarting,
      _ => Self::Unknown,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Offline => "Offline",
      Self::Online => "Online",
      Self::Starting => "Starting",
      Self::Stopping => "Stopping",
      Self::Restarting => "Restarting",
      Self::Unknown => "Unknown",
    }
  }

  pub fn color(self) -> StatusColor {
    match self {
      Self::Offline => StatusColor::Red,
      Self::Online => StatusColor::Green,
      Self::Starting => StatusColor::Yellow,
      Self::Stopping => StatusColor::Orange,
      Self::Restarting => StatusColor::Blue,
      Self::Unknown => StatusColor::Grey,
    }
  }

  pub fn is_online(self) -> bool {
    self == Self::Online
  }
}

/// Semantic status color. Front ends decide how to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
  Red,
  Green,
  Yellow,
  Orange,
  Blue,
  Grey,
}

impl StatusColor {
  pub fn rgb(self) -> u32 {
    match self {
      Self::Red => 0xe74c3c,
      Self::Green => 0x2ecc71,
      Self::Yellow => 0xf1c40f,
      Self::Orange => 0xe67e22,
      Self::Blue => 0x3498db,
      Self::Grey => 0x95a5a6,
    }
  }

  /// CSS-style `#rrggbb`.
  pub fn hex(self) -> String {
    format!("#{:06x}", self.rgb())
  }
}

/// One poll result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
  pub status: ServerStatus,
  pub name: String,
  pub players: BTreeSet<String>,
}

impl Snapshot {
  pub fn new<I, S>(status: ServerStatus, name: impl Into<String>, players: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      status,
      name: name.into(),
      players: players.into_iter().map(Into::into).collect(),
    }
  }
}

/// A continuous interval during which one player was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
  pub start: DateTime<Utc>,
  /// `None` while the player is still online.
  pub end: Option<DateTime<Utc>>,
}

impl Session {
  pub fn open(start: DateTime<Utc>) -> Self {
    Self { start, end: None }
  }

  pub fn is_open(&self) -> bool {
    self.end.is_none()
  }

  /// Close the session. `end` never precedes `start`, even if the clock stepped back.
  pub fn close(&mut self, at: DateTime<Utc>) {
    self.end = Some(at.max(self.start));
  }

  pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
    (self.end.unwrap_or(now) - self.start).max(TimeDelta::zero())
  }
}

/// A session rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpan {
  pub start: DateTime<Utc>,
  pub end: Option<DateTime<Utc>>,
  /// `HH:MM` in the reference zone
  pub start_local: String,
  pub end_local: Option<String>,
}

impl SessionSpan {
  /// `10:00–11:30`, or `10:00–…` while open.
  pub fn label(&self) -> String {
    format!(
      "{}–{}",
      self.start_local,
      self.end_local.as_deref().unwrap_or(IN_PROGRESS)
    )
  }
}

/// Everything one player did today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerActivity {
  pub player: String,
  pub sessions: Vec<SessionSpan>,
  pub total: TimeDelta,
}

impl PlayerActivity {
  pub fn spans_label(&self) -> String {
    self
      .sessions
      .iter()
      .map(SessionSpan::label)
      .collect::<Vec<_>>()
      .join(", ")
  }

  pub fn total_label(&self) -> String {
    format_duration_hm(self.total)
  }

  pub fn is_online(&self) -> bool {
    self.sessions.iter().any(|s| s.end.is_none())
  }
}

/// Immutable, publisher-facing snapshot of the tracker. Replaced wholesale each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
  pub status: ServerStatus,
  pub status_text: String,
  pub color: StatusColor,
  pub server_name: String,
  /// Players online right now, sorted by name.
  pub players: Vec<String>,
  /// Players seen today, in the order they first joined.
  pub sessions: Vec<PlayerActivity>,
  /// `None` while the server is not online.
  pub uptime: Option<TimeDelta>,
  /// `None` until the first successful tick.
  pub last_update: Option<DateTime<Utc>>,
  /// This tick moved the server into `Online`.
  pub became_online: bool,
}

impl StatusView {
  /// The view published before any tick has completed.
  pub fn not_started() -> Self {
    let status = ServerStatus::Unknown;
    Self {
      status,
      status_text: status.label().to_string(),
      color: status.color(),
      server_name: String::new(),
      players: Vec::new(),
      sessions: Vec::new(),
      uptime: None,
      last_update: None,
      became_online: false,
    }
  }

  pub fn uptime_text(&self) -> String {
    self
      .uptime
      .map(format_duration_hm)
      .unwrap_or_else(|| NO_UPTIME.to_string())
  }

  pub fn activity_for(&self, player: &str) -> Option<&PlayerActivity> {
    self.sessions.iter().find(|a| a.player == player)
  }
}

impl Default for StatusView {
  fn default() -> Self {
    Self::not_started()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_status_mapping_is_total() {
    assert_eq!(ServerStatus::from_code(0), ServerStatus::Offline);
    assert_eq!(ServerStatus::from_code(1), ServerStatus::Online);
    assert_eq!(ServerStatus::from_code(4), ServerStatus::Restarting);
    assert_eq!(ServerStatus::from_code(7), ServerStatus::Unknown);
    assert_eq!(ServerStatus::from_code(-1), ServerStatus::Unknown);
    assert_eq!(ServerStatus::Unknown.label(), "Unknown");
    assert_eq!(ServerStatus::Unknown.color(), StatusColor::Grey);
  }

  #[test]
  fn test_status_serializes_lowercase() {
    assert_eq!(
      serde_json::to_value(ServerStatus::Restarting).unwrap(),
      serde_json::json!("restarting")
    );
    assert_eq!(
      serde_json::to_value(StatusColor::Grey).unwrap(),
      serde_json::json!("grey")
    );
  }

  #[test]
  fn test_color_hex() {
    assert_eq!(StatusColor::Green.hex(), "#2ecc71");
    assert_eq!(StatusColor::Red.hex(), "#e74c3c");
  }

  #[test]
  fn test_snapshot_deduplicates_players() {
    let snapshot = Snapshot::new(ServerStatus::Online, "srv", ["Steve", "Alex", "Steve"]);
    assert_eq!(snapshot.players.len(), 2);
  }

  #[test]
  fn test_session_close_never_precedes_start() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let mut session = Session::open(start);
    session.close(start - TimeDelta::minutes(5));
    assert_eq!(session.end, Some(start));
    assert_eq!(session.elapsed(start + TimeDelta::hours(1)), TimeDelta::zero());
  }

  #[test]
  fn test_open_session_elapsed_uses_now() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let session = Session::open(start);
    assert_eq!(
      session.elapsed(start + TimeDelta::minutes(42)),
      TimeDelta::minutes(42)
    );
  }

  #[test]
  fn test_not_started_view() {
    let view = StatusView::not_started();
    assert_eq!(view.status_text, "Unknown");
    assert!(view.players.is_empty());
    assert_eq!(view.uptime_text(), NO_UPTIME);
    assert!(view.last_update.is_none());
  }

  #[test]
  fn test_span_label_marks_open_session() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let span = SessionSpan {
      start: at,
      end: None,
      start_local: "13:00".to_string(),
      end_local: None,
    };
    assert_eq!(span.label(), "13:00–…");
  }
}
