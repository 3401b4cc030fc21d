//! Cooperative periodic timers.
//!
//! Timers never own a thread. Time is a `Duration` since the view was
//! created, supplied by whoever drives the loop, so the same code runs under
//! the window event loop and under tests.

use std::time::Duration;

/// Period of the mission tick that advances elapsed minutes.
pub const MISSION_TICK: Duration = Duration::from_secs(60);

/// Period of the digital clock refresh.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Spacing between elapsed-arc blink toggles.
pub const BLINK_TICK: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicTimer {
    period: Duration,
    next_due: Option<Duration>,
}

impl PeriodicTimer {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule the first firing one period after `now`. Re-arming an armed
    /// timer restarts its phase.
    pub fn arm(&mut self, now: Duration) {
        self.next_due = Some(now + self.period);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Returns `true` once per period that has come due by `now`.
    ///
    /// Call in a loop to catch up after a late wake-up; the next deadline
    /// advances by exactly one period each time so ticks do not drift.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }
}

/// Earliest of several optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Duration>>) -> Option<Duration> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_timer_never_fires() {
        let mut timer = PeriodicTimer::new(CLOCK_TICK);
        assert!(!timer.poll(Duration::from_secs(100)));
        assert_eq!(timer.next_due(), None);
    }

    #[test]
    fn fires_once_per_period() {
        let mut timer = PeriodicTimer::new(MISSION_TICK);
        timer.arm(Duration::ZERO);
        assert!(!timer.poll(Duration::from_secs(59)));
        assert!(timer.poll(Duration::from_secs(60)));
        assert!(!timer.poll(Duration::from_secs(61)));
        assert_eq!(timer.next_due(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn catches_up_without_drift() {
        let mut timer = PeriodicTimer::new(BLINK_TICK);
        timer.arm(Duration::from_millis(100));
        let mut fired = 0;
        while timer.poll(Duration::from_millis(1700)) {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(timer.next_due(), Some(Duration::from_millis(2100)));
    }

    #[test]
    fn disarm_stops_firing() {
        let mut timer = PeriodicTimer::new(CLOCK_TICK);
        timer.arm(Duration::ZERO);
        timer.disarm();
        assert!(!timer.poll(Duration::from_secs(5)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn earliest_ignores_unarmed() {
        assert_eq!(earliest([None, None]), None);
        assert_eq!(
            earliest([None, Some(Duration::from_secs(3)), Some(Duration::from_secs(1))]),
            Some(Duration::from_secs(1))
        );
    }
}
