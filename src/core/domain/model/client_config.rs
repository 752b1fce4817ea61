//! Tunables for the HTTP client and the poll engine.

use crate::core::domain::error::ValidationError;
use std::time::Duration;

/// Client-side request throttling, applied before every HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Sustained requests per second.
    pub requests_per_second: u32,
    /// Requests allowed in a burst before throttling starts.
    pub burst_size: u32,
}

/// A constant-interval, bounded-duration poll schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_duration: Duration,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_duration: Duration) -> Self {
        Self {
            interval,
            max_duration,
        }
    }
}

/// Wait windows for each asynchronous create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindows {
    pub cluster: PollPolicy,
    pub node_group: PollPolicy,
    pub storage: PollPolicy,
    pub load_balancer: PollPolicy,
}

impl Default for PollWindows {
    fn default() -> Self {
        let interval = Duration::from_secs(5);
        Self {
            cluster: PollPolicy::new(interval, Duration::from_secs(1800)),
            node_group: PollPolicy::new(interval, Duration::from_secs(3000)),
            storage: PollPolicy::new(interval, Duration::from_secs(3000)),
            load_balancer: PollPolicy::new(interval, Duration::from_secs(3000)),
        }
    }
}

impl PollWindows {
    /// The same policy for every resource kind.
    pub fn uniform(policy: PollPolicy) -> Self {
        Self {
            cluster: policy,
            node_group: policy,
            storage: policy,
            load_balancer: policy,
        }
    }
}

/// Configuration for [`crate::IdcServicesClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Optional client-side rate limit. `None` disables throttling.
    pub rate_limit: Option<RateLimitConfig>,
    /// Optional timeout for a single HTTP exchange.
    pub request_timeout: Option<Duration>,
    /// Poll schedules for asynchronous creates.
    pub poll: PollWindows,
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if let Some(rl) = self.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                return Err(ValidationError::ConstraintViolation(
                    "Rate limit requests_per_second and burst_size must be positive".to_string(),
                ));
            }
        }
        for policy in [
            self.poll.cluster,
            self.poll.node_group,
            self.poll.storage,
            self.poll.load_balancer,
        ] {
            if policy.interval.is_zero() {
                return Err(ValidationError::ConstraintViolation(
                    "Poll interval must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}
