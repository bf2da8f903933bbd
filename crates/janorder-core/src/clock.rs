//! Clock port: where finalization timestamps come from.

use chrono::{Local, NaiveDateTime};
use std::sync::Mutex;

use crate::types::OrderTimestamp;

/// Source of the local wall-clock instant stamped on orders.
pub trait Clock: Send + Sync {
    fn now(&self) -> OrderTimestamp;
}

/// Local system time, never going backwards within one process.
///
/// If the wall clock steps back (NTP correction, DST handled by the OS),
/// the last issued instant is repeated instead.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Option<NaiveDateTime>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OrderTimestamp {
        let current = Local::now().naive_local();
        // a poisoned lock only means another thread panicked mid-update
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let issued = match *last {
            Some(previous) if previous > current => previous,
            _ => current,
        };
        *last = Some(issued);
        OrderTimestamp::from_datetime(issued)
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OrderTimestamp);

impl FixedClock {
    pub fn at(at: NaiveDateTime) -> Self {
        FixedClock(OrderTimestamp::from_datetime(at))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OrderTimestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_system_clock_repeats_after_backwards_step() {
        let clock = SystemClock::new();
        let future = Local::now().naive_local() + chrono::Duration::hours(1);
        *clock.last.lock().unwrap() = Some(future);
        assert_eq!(clock.now(), OrderTimestamp::from_datetime(future));
    }

    #[test]
    fn test_fixed_clock() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let clock = FixedClock::at(at);
        assert_eq!(clock.now().to_string(), "2024-03-09 08:30:00");
        assert_eq!(clock.now(), clock.now());
    }
}
