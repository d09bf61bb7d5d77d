use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Bounded retry with linear backoff.
///
/// Delay before attempt `k` (1-based) is `base_delay × (k - 1)`:
/// 0ms, 1s, 2s, ... for the default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least 1 so the operation always runs once.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Backoff to wait before running `attempt`. Zero for the first attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_sub(1))
    }

    /// True if another attempt is allowed after `attempt` failed.
    pub fn has_remaining(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        )
    }
}

/// What a flow does with a terminal failure.
///
/// `Propagate` returns the failure to the caller (handlers map it to an error status).
/// `Placeholder` swaps it for a user-facing value and reports success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Propagate,
    Placeholder,
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" | "raise" => Ok(FailureMode::Propagate),
            "placeholder" => Ok(FailureMode::Placeholder),
            other => Err(format!(
                "unknown failure mode '{other}' (expected 'propagate' or 'placeholder')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_observed_behavior() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_no_delay_before_first_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        assert_eq!(policy.delay_before(1), Duration::ZERO);
    }

    #[test]
    fn test_delay_grows_linearly_with_attempt_index() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        for k in 2..=5u32 {
            assert_eq!(
                policy.delay_before(k),
                Duration::from_millis(250 * (k as u64 - 1))
            );
        }
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.has_remaining(1));
    }

    #[test]
    fn test_has_remaining_stops_at_bound() {
        let policy = RetryPolicy::default();
        assert!(policy.has_remaining(1));
        assert!(policy.has_remaining(2));
        assert!(!policy.has_remaining(3));
    }

    #[test]
    fn test_failure_mode_parsing() {
        assert_eq!("propagate".parse::<FailureMode>(), Ok(FailureMode::Propagate));
        assert_eq!("RAISE".parse::<FailureMode>(), Ok(FailureMode::Propagate));
        assert_eq!(
            " placeholder ".parse::<FailureMode>(),
            Ok(FailureMode::Placeholder)
        );
        assert!("retry-forever".parse::<FailureMode>().is_err());
    }
}
