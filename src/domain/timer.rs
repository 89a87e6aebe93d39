//! Single tick timer owned by a draw session
//!
//! The timer never fires by itself: the owner polls it with the current
//! instant. Cancelling clears the deadline, so a cancelled timer can never
//! report a due tick.

use std::time::{Duration, Instant};

/// Default interval between preview refreshes
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedules the next tick one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True when armed and the deadline has passed
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left until the next tick, if armed
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_timer_is_never_due() {
        let timer = TickTimer::default();
        assert!(!timer.is_due(Instant::now() + Duration::from_secs(60)));
        assert_eq!(timer.until_next(Instant::now()), None);
    }

    #[test]
    fn armed_timer_due_after_interval() {
        let mut timer = TickTimer::new(Duration::from_millis(100));
        let now = Instant::now();
        timer.arm(now);

        assert!(!timer.is_due(now + Duration::from_millis(99)));
        assert!(timer.is_due(now + Duration::from_millis(100)));
        assert_eq!(timer.until_next(now), Some(Duration::from_millis(100)));
    }

    #[test]
    fn cancel_clears_deadline() {
        let mut timer = TickTimer::default();
        let now = Instant::now();
        timer.arm(now);
        timer.cancel();

        assert_eq!(timer.until_next(now), None);
        assert!(!timer.is_due(now + Duration::from_secs(1)));
    }
}
