// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deadline-based timers driven by the owner's clock.
//!
//! Nothing here sleeps or spawns: the owning view passes `now` into `poll`
//! on every tick. Each armed timer holds a [`Lease`], so a timer that is
//! cancelled, replaced or dropped releases its slot.

use crate::lifecycle::{Lease, ResourceKind, ResourceTracker};
use std::time::{Duration, Instant};

/// A one-shot timer that restarts instead of queueing.
#[derive(Debug, Default)]
pub struct Timeout {
    armed: Option<(Instant, Lease)>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `now + delay`, cancelling any pending deadline first.
    pub fn restart(&mut self, now: Instant, delay: Duration, tracker: &ResourceTracker) {
        self.armed = None;
        self.armed = Some((now + delay, tracker.acquire(ResourceKind::Timer)));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// `true` exactly once, when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = matches!(&self.armed, Some((deadline, _)) if now >= *deadline);
        if due {
            self.armed = None;
        }
        due
    }
}

/// A repeating timer.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Option<(Instant, Lease)>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// (Re)start counting a full period from `now`.
    pub fn start(&mut self, now: Instant, tracker: &ResourceTracker) {
        self.next = None;
        self.next = Some((now + self.period, tracker.acquire(ResourceKind::Timer)));
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Number of periods elapsed since the last poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some((next, _)) = self.next.as_mut() else {
            return 0;
        };
        let mut fired = 0;
        while now >= *next && !self.period.is_zero() {
            *next += self.period;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_restart_replaces_deadline() {
        let tracker = ResourceTracker::new();
        let start = Instant::now();
        let mut timeout = Timeout::new();
        timeout.restart(start, Duration::from_millis(500), &tracker);
        timeout.restart(start + Duration::from_millis(300), Duration::from_millis(500), &tracker);
        assert_eq!(tracker.live(ResourceKind::Timer), 1);
        assert!(!timeout.poll(start + Duration::from_millis(600)));
        assert!(timeout.poll(start + Duration::from_millis(800)));
        assert!(!timeout.poll(start + Duration::from_millis(900)));
        assert_eq!(tracker.live(ResourceKind::Timer), 0);
    }

    #[test]
    fn interval_counts_missed_periods() {
        let tracker = ResourceTracker::new();
        let start = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(5));
        interval.start(start, &tracker);
        assert_eq!(interval.poll(start + Duration::from_secs(4)), 0);
        assert_eq!(interval.poll(start + Duration::from_secs(16)), 3);
        interval.stop();
        assert_eq!(interval.poll(start + Duration::from_secs(60)), 0);
        assert_eq!(tracker.total_live(), 0);
    }
}
