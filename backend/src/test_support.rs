//! Test doubles shared by unit and integration tests.
//!
//! Compiled for the `test-support` feature only.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock whose reading only changes when a test moves it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    /// Move forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        // A poisoned clock only means another test thread panicked mid-write.
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn clock_moves_only_when_told() {
        let start = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 0).single().expect("instant");
        let clock = MutableClock::new(start);
        assert_eq!(clock.utc(), start);

        clock.advance(TimeDelta::minutes(2));
        assert_eq!(clock.utc(), start + TimeDelta::minutes(2));

        clock.set(start);
        assert_eq!(clock.utc(), start);
    }
}
