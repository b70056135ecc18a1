//! Timer capability used by the quiz scheduler.
//!
//! The scheduler never sleeps. It arms a timer, returns, and expects its owner
//! to deliver `QuizEvent::TimerElapsed(handle)` once the delay has passed.
//! [`DeadlineTimer`] keeps the deadlines for a driver loop that waits on
//! them.

use crate::config::MAX_PHASE_DURATION;
use std::time::{Duration, Instant};
use tracing::warn;

/// Identifies one armed timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait Timer {
    /// Arm a one-shot timer firing after `delay`.
    fn arm(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a timer. Cancelling one that already fired or was already
    /// cancelled does nothing.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Wall-clock timer that records deadlines for the driver loop to wait on.
/// Delays longer than [`MAX_PHASE_DURATION`] are shortened to it.
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    next_id: u64,
    pending: Vec<(TimerHandle, Instant)>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at)| *at).min()
    }

    /// Remove and return the earliest timer whose deadline is at or before `now`
    pub fn take_expired(&mut self, now: Instant) -> Option<TimerHandle> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, at))| *at <= now)
            .min_by_key(|(_, (_, at))| *at)?;
        Some(self.pending.remove(index).0)
    }

    /// Number of armed, unfired timers
    pub fn active_count(&self) -> usize {
        self.pending.len()
    }

    fn arm_at(&mut self, at: Instant) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((handle, at));
        handle
    }
}

impl Timer for DeadlineTimer {
    fn arm(&mut self, delay: Duration) -> TimerHandle {
        let now = Instant::now();
        let at = match now.checked_add(delay.min(MAX_PHASE_DURATION)) {
            Some(at) => at,
            None => {
                warn!(delay_ms = delay.as_millis() as u64, "delay out of range, firing now");
                now
            }
        };
        self.arm_at(at)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_expire() {
        let mut timer = DeadlineTimer::new();
        let start = Instant::now();
        let handle = timer.arm_at(start + Duration::from_millis(50));

        assert_eq!(timer.active_count(), 1);
        assert_eq!(timer.take_expired(start), None);
        assert_eq!(timer.take_expired(start + Duration::from_millis(50)), Some(handle));
        assert_eq!(timer.active_count(), 0);
        assert_eq!(timer.next_deadline(), None);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = DeadlineTimer::new();
        let handle = timer.arm(Duration::from_secs(10));
        timer.cancel(handle);
        timer.cancel(handle);
        assert_eq!(timer.active_count(), 0);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut timer = DeadlineTimer::new();
        let start = Instant::now();
        let fired = timer.arm_at(start);
        assert_eq!(timer.take_expired(start), Some(fired));

        let other = timer.arm_at(start + Duration::from_secs(1));
        timer.cancel(fired);
        assert_eq!(timer.active_count(), 1);
        assert_eq!(timer.next_deadline(), Some(start + Duration::from_secs(1)));
        timer.cancel(other);
    }

    #[test]
    fn test_huge_delay_is_capped() {
        let mut timer = DeadlineTimer::new();
        let before = Instant::now();
        timer.arm(Duration::from_secs_f64(1e19));
        timer.arm(Duration::MAX);

        assert_eq!(timer.active_count(), 2);
        let latest = timer.pending.iter().map(|(_, at)| *at).max().unwrap();
        assert!(latest <= Instant::now() + MAX_PHASE_DURATION);
        assert!(latest >= before + MAX_PHASE_DURATION);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut timer = DeadlineTimer::new();
        let a = timer.arm(Duration::from_millis(1));
        timer.cancel(a);
        let b = timer.arm(Duration::from_millis(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_earliest_expired_first() {
        let mut timer = DeadlineTimer::new();
        let start = Instant::now();
        let late = timer.arm_at(start + Duration::from_millis(20));
        let early = timer.arm_at(start + Duration::from_millis(10));
        let now = start + Duration::from_millis(30);
        assert_eq!(timer.take_expired(now), Some(early));
        assert_eq!(timer.take_expired(now), Some(late));
    }
}
