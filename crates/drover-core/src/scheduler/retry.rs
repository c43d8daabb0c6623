//! Retry schedule for tasks that found no idle worker.
//!
//! The default is a fixed, unconditional, unbounded schedule: a queue with
//! permanently insufficient capacity retries its tasks forever at a fixed
//! cadence. That is a deliberate simplicity trade-off, kept as the default.
//! `Bounded` is the opt-in alternative that gives up after a set number of
//! planning attempts.

use std::time::Duration;

/// How unmatched tasks are re-submitted into the intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrySchedule {
    /// Retry forever at a fixed interval.
    Fixed(Duration),

    /// Retry at a fixed interval, giving up (task marked failed) once
    /// `max_attempts` planning passes found no worker.
    Bounded {
        delay: Duration,
        max_attempts: u32,
    },
}

impl RetrySchedule {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(10);

    pub fn default_fixed() -> Self {
        RetrySchedule::Fixed(Self::DEFAULT_DELAY)
    }

    pub fn delay(&self) -> Duration {
        match *self {
            RetrySchedule::Fixed(delay) => delay,
            RetrySchedule::Bounded { delay, .. } => delay,
        }
    }

    /// May a task that already failed to match `attempts` times be retried?
    pub fn allows(&self, attempts: u32) -> bool {
        match *self {
            RetrySchedule::Fixed(_) => true,
            RetrySchedule::Bounded { max_attempts, .. } => attempts < max_attempts,
        }
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::default_fixed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_is_fixed_ten_seconds() {
        let schedule = RetrySchedule::default();
        assert_eq!(schedule, RetrySchedule::Fixed(Duration::from_secs(10)));
        assert_eq!(schedule.delay(), Duration::from_secs(10));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(10_000)]
    fn fixed_always_allows(#[case] attempts: u32) {
        assert!(RetrySchedule::default_fixed().allows(attempts));
    }

    #[rstest]
    #[case(0, true)]
    #[case(2, true)]
    #[case(3, false)]
    #[case(4, false)]
    fn bounded_stops_at_max_attempts(#[case] attempts: u32, #[case] allowed: bool) {
        let schedule = RetrySchedule::Bounded {
            delay: Duration::from_millis(10),
            max_attempts: 3,
        };
        assert_eq!(schedule.allows(attempts), allowed);
    }
}
