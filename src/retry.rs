// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Retry with exponential backoff for upstream calls.
//!
//! [`retry`] runs an operation up to [`RetryPolicy::max_attempts`] times,
//! sequentially. Between attempts it sleeps, doubling the delay each time:
//!
//! ```text
//! delay(n) = base_delay * 2^n
//! ```
//!
//! There is no jitter and no cap. Every error the operation returns is treated
//! the same way; callers that want a failure to be final return `Ok` from the
//! operation and classify afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use slotscan::{retry, RequestContext, RetryPolicy};
//! use std::time::Duration;
//!
//! let ctx = RequestContext::with_timeout(Duration::from_secs(5));
//! let policy = RetryPolicy::new(3, Duration::from_millis(100));
//!
//! let head = retry(&ctx, &policy, || async {
//!     Ok::<_, SlotscanError>(ctx.run(client.head_slot_number()).await??)
//! })
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::context::{ContextError, RequestContext};
use crate::errors::{RpcError, SlotscanError};

/// Default number of attempts, including the first one.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default base delay for exponential backoff (100ms).
const DEFAULT_BASE_DELAY_MS: u64 = 100;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Sleep after the first failed attempt; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A policy that makes a single attempt
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Runs `operation` until it succeeds or the attempts run out.
///
/// - Success returns immediately.
/// - After a failed attempt, a cancelled or expired `ctx` ends the loop with
///   the context error, without sleeping.
/// - Otherwise the loop sleeps for the current delay and doubles it.
/// - When every attempt fails, the error of the last attempt is returned.
pub async fn retry<T, E, F, Fut>(
    ctx: &RequestContext,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<ContextError> + std::fmt::Display,
{
    let attempts = policy.attempts();
    let mut delay = policy.base_delay;
    let mut attempt = 1u32;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if let Some(ctx_error) = ctx.error() {
            debug!(
                error = %error,
                attempt,
                reason = %ctx_error,
                "Context done, abandoning retries"
            );
            return Err(ctx_error.into());
        }

        if attempt >= attempts {
            warn!(error = %error, attempts, "Max attempts exceeded");
            return Err(error);
        }

        warn!(
            error = %error,
            attempt,
            max_attempts = attempts,
            delay_ms = delay.as_millis() as u64,
            "Attempt failed, backing off"
        );

        tokio::time::sleep(delay).await;
        delay = delay.checked_mul(2).unwrap_or(Duration::MAX);
        attempt += 1;
    }
}

/// Retries an upstream call, racing every attempt against the request deadline
///
/// A deadline hit while an attempt is in flight ends that attempt with
/// [`SlotscanError::RequestTimeout`], and the retry loop then stops because the
/// context is done.
pub(crate) async fn retry_upstream<T, F, Fut>(
    ctx: &RequestContext,
    policy: &RetryPolicy,
    operation: F,
) -> Result<T, SlotscanError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, RpcError>>,
{
    retry(ctx, policy, || async {
        let value = ctx.run(operation()).await??;
        Ok::<_, SlotscanError>(value)
    })
    .await
}
