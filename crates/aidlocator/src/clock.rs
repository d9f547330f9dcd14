//! Wall-clock access, injectable so cache expiry and "open now" checks can be tested.
use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Local, TimeDelta};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Local>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub const fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Local.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(TimeDelta::minutes(90));
        assert_eq!(clock.now().hour(), 11);
        assert_eq!(clock.now_millis() - start.timestamp_millis(), 90 * 60 * 1000);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2025, 6, 14, 9, 0, 0).unwrap());
        clock.set(Local.with_ymd_and_hms(2025, 6, 14, 21, 0, 0).unwrap());
        assert_eq!(clock.now().hour(), 21);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let first = SystemClock.now_millis();
        let second = SystemClock.now_millis();
        assert!(second >= first);
    }
}
