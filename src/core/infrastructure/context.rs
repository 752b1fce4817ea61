//! Ambient cancellation and deadline for a single host call.

use crate::core::domain::error::{IdcError, IdcResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Carries the host's cancellation signal and optional deadline through every
/// service call, down to the HTTP exchange and the poll sleep.
///
/// Cloning shares the same token: cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a token owned by the host.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets an absolute deadline, keeping the earlier one if already set.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// A context cancelled together with this one, but cancellable on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the cancellation cause if the context is already done.
    pub fn check(&self) -> IdcResult<()> {
        if self.token.is_cancelled() {
            return Err(cancelled());
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(deadline_exceeded());
        }
        Ok(())
    }

    /// Resolves with the cancellation cause once the context is done.
    pub async fn done(&self) -> IdcError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => cancelled(),
                _ = tokio::time::sleep_until(deadline) => deadline_exceeded(),
            },
            None => {
                self.token.cancelled().await;
                cancelled()
            }
        }
    }

    /// Drives `fut` to completion unless the context finishes first.
    pub async fn run<T, F>(&self, fut: F) -> IdcResult<T>
    where
        F: Future<Output = IdcResult<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = fut => result,
        }
    }
}

fn cancelled() -> IdcError {
    IdcError::Cancelled("context cancelled".to_string())
}

fn deadline_exceeded() -> IdcError {
    IdcError::Cancelled("context deadline exceeded".to_string())
}
