//! Retry Policy
//!
//! Attempt budget and delay schedule used while waiting for the Vault server to
//! become reachable. The policy is pure bookkeeping; callers do the sleeping.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;

/// Upper bound applied to exponential delays when no explicit cap is set.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// How the delay grows between attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    #[default]
    Fixed,
    /// Delay doubles after every failed attempt
    Exponential,
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backoff::Fixed => write!(f, "fixed"),
            Backoff::Exponential => write!(f, "exponential"),
        }
    }
}

impl FromStr for Backoff {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Backoff::Fixed),
            "exponential" => Ok(Backoff::Exponential),
            other => Err(CoreError::parse(format!(
                "unknown backoff '{}', expected 'fixed' or 'exponential'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    backoff: Backoff,
    max_attempts: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: usize, delay: Duration) -> Self {
        Self::new(Backoff::Fixed, max_attempts, delay)
    }

    pub fn exponential(max_attempts: usize, base_delay: Duration) -> Self {
        Self::new(Backoff::Exponential, max_attempts, base_delay)
    }

    /// Build a policy. `max_attempts` counts every attempt including the
    /// first, and is never less than one.
    pub fn new(backoff: Backoff, max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            backoff,
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: DEFAULT_MAX_DELAY.max(base_delay),
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay.max(self.base_delay);
        self
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn handle(&self) -> RetryHandle {
        RetryHandle {
            policy: self.clone(),
            attempts: 0,
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let raw = match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let shift = attempt.saturating_sub(1).min(31) as u32;
                self.base_delay.saturating_mul(1u32 << shift)
            }
        };
        raw.min(self.max_delay)
    }
}

/// Per-run retry state derived from a [`RetryPolicy`].
pub struct RetryHandle {
    policy: RetryPolicy,
    attempts: usize,
}

impl RetryHandle {
    /// Record a failed attempt and return how long to wait before the next
    /// one, or `None` once the attempt budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts + 1 >= self.policy.max_attempts {
            self.attempts = self.policy.max_attempts;
            return None;
        }
        self.attempts += 1;
        Some(self.policy.delay_for_attempt(self.attempts))
    }

    /// Failed attempts recorded so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn max_attempts(&self) -> usize {
        self.policy.max_attempts
    }
}
