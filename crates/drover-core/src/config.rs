//! Scheduler configuration.
//!
//! Read once at startup. A malformed value is fatal: the scheduler must not
//! start with an ill-defined pool.

use std::time::Duration;

use crate::error::DroverError;
use crate::scheduler::RetrySchedule;

/// Environment variable holding the static worker-pool size.
pub const POOL_SIZE_ENV: &str = "DROVER_POOL_SIZE";

/// Environment variable holding the retry delay in seconds (optional).
pub const RETRY_SECS_ENV: &str = "DROVER_RETRY_SECS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of workers provisioned at startup. A pool of 0 is legal: no
    /// task is ever matched and every task retries per the schedule.
    pub pool_size: usize,

    pub retry: RetrySchedule,
}

impl SchedulerConfig {
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            retry: RetrySchedule::default_fixed(),
        }
    }

    pub fn with_retry(mut self, retry: RetrySchedule) -> Self {
        self.retry = retry;
        self
    }

    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, DroverError> {
        let raw = std::env::var(POOL_SIZE_ENV)
            .map_err(|_| DroverError::Config(format!("{POOL_SIZE_ENV} is not set")))?;
        let pool_size = parse_pool_size(&raw)?;

        let retry = match std::env::var(RETRY_SECS_ENV) {
            Ok(raw) => RetrySchedule::Fixed(parse_retry_secs(&raw)?),
            Err(_) => RetrySchedule::default_fixed(),
        };

        Ok(Self { pool_size, retry })
    }
}

fn parse_pool_size(raw: &str) -> Result<usize, DroverError> {
    raw.trim()
        .parse()
        .map_err(|e| DroverError::Config(format!("{POOL_SIZE_ENV}={raw:?}: {e}")))
}

fn parse_retry_secs(raw: &str) -> Result<Duration, DroverError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|e| DroverError::Config(format!("{RETRY_SECS_ENV}={raw:?}: {e}")))?;
    if secs == 0 {
        return Err(DroverError::Config(format!(
            "{RETRY_SECS_ENV} must be at least 1"
        )));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("4", 4)]
    #[case(" 16 ", 16)]
    fn pool_size_parses(#[case] raw: &str, #[case] expected: usize) {
        assert_eq!(parse_pool_size(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("four")]
    #[case("-1")]
    fn malformed_pool_size_is_a_config_fault(#[case] raw: &str) {
        assert!(matches!(
            parse_pool_size(raw),
            Err(DroverError::Config(_))
        ));
    }

    #[test]
    fn retry_secs_parses_and_rejects_zero() {
        assert_eq!(parse_retry_secs("10").unwrap(), Duration::from_secs(10));
        assert!(matches!(
            parse_retry_secs("0"),
            Err(DroverError::Config(_))
        ));
        assert!(matches!(
            parse_retry_secs("soon"),
            Err(DroverError::Config(_))
        ));
    }

    #[test]
    fn default_retry_is_the_fixed_schedule() {
        let config = SchedulerConfig::new(4);
        assert_eq!(config.retry, RetrySchedule::default_fixed());
    }
}
