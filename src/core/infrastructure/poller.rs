//! Bounded, constant-interval polling of asynchronous upstream operations.

use crate::core::{
    domain::{
        error::{IdcError, IdcResult},
        model::client_config::PollPolicy,
    },
    infrastructure::context::OperationContext,
};
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Result of one poll attempt.
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// The operation converged.
    Done(T),
    /// Not there yet; try again after the interval.
    Retry(String),
    /// The operation will never converge.
    Fail(IdcError),
}

/// Runs `attempt` every `policy.interval` until it yields `Done` or `Fail`.
///
/// Each attempt is bounded by the time left in the window. When the window
/// closes, or the next attempt could not start inside it, the poll ends with
/// [`IdcError::DeadlineExceeded`] naming `what`, whatever the last outcome was.
/// Cancellation of `ctx` ends the poll at once with [`IdcError::Cancelled`].
pub async fn poll<T, F, Fut>(
    ctx: &OperationContext,
    policy: PollPolicy,
    what: &str,
    mut attempt: F,
) -> IdcResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollOutcome<T>>,
{
    let deadline = Instant::now() + policy.max_duration;
    let expired = || IdcError::DeadlineExceeded {
        resource: what.to_string(),
    };
    let mut attempts: u32 = 0;

    loop {
        ctx.check()?;
        attempts += 1;

        let outcome = tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            outcome = tokio::time::timeout_at(deadline, attempt()) => outcome,
        };

        match outcome {
            Err(_elapsed) => {
                debug!(resource = what, attempts, "poll attempt overran the window");
                return Err(expired());
            }
            Ok(PollOutcome::Done(value)) => {
                debug!(resource = what, attempts, "poll converged");
                return Ok(value);
            }
            Ok(PollOutcome::Fail(err)) => {
                debug!(resource = what, attempts, error = %err, "poll aborted");
                return Err(err);
            }
            Ok(PollOutcome::Retry(reason)) => {
                trace!(resource = what, attempts, reason = %reason, "poll retry");
            }
        }

        if Instant::now() + policy.interval > deadline {
            debug!(resource = what, attempts, "poll window exhausted");
            return Err(expired());
        }

        tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            _ = tokio::time::sleep(policy.interval) => {}
        }
    }
}
