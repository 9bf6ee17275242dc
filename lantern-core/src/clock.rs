//! Time sources and reference-timezone helpers.
//!
//! Everything the tracker stores is a UTC instant. Conversion into the
//! reference timezone happens only here, for day-boundary checks and display.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use std::sync::Mutex;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The fixed timezone used for midnight resets and every HH:MM label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone(Tz);

impl ReferenceZone {
    pub const fn new(tz: Tz) -> Self {
        Self(tz)
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.0)
    }

    /// Calendar date of `instant` in the reference zone, independent of the host timezone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local(instant).date_naive()
    }

    pub fn format_hm(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%H:%M").to_string()
    }

    /// `HH:MM:SS` followed by the zone abbreviation, e.g. `21:04:11 CEST`.
    pub fn format_hms(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%H:%M:%S %Z").to_string()
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self(chrono_tz::Europe::Berlin)
    }
}

/// Format as whole hours and remaining minutes. Hours keep counting past 24.
pub fn format_duration_hm(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}
