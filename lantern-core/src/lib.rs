mod board;
mod clock;
mod error;
mod models;
mod monitor;
mod sessions;
mod source;
mod tracker;

pub use board::StatusBoard;
pub use clock::{Clock, ManualClock, ReferenceZone, SystemClock, format_duration_hm};
pub use error::{PollError, Result};
pub use models::{
    IN_PROGRESS, NO_UPTIME, PlayerActivity, ServerStatus, Session, SessionSpan, Snapshot,
    StatusColor, StatusView,
};
pub use monitor::{Monitor, TickResult};
pub use sessions::{PlayerSessions, SessionLog};
pub use source::StatusSource;
pub use tracker::SessionTracker;

pub use chrono_tz::Tz;
