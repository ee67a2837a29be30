// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-request deadline and cancellation.
//!
//! A [`RequestContext`] travels with a query through every layer. Upstream
//! calls are raced against its deadline with [`RequestContext::run`], and the
//! retry loop consults [`RequestContext::error`] after each failed attempt.
//!
//! ```rust
//! use slotscan::RequestContext;
//! use std::time::Duration;
//!
//! let ctx = RequestContext::with_timeout(Duration::from_secs(5));
//! assert!(ctx.error().is_none());
//! ctx.cancel();
//! assert!(ctx.error().is_some());
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Why a request context is no longer usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The deadline has passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// [`RequestContext::cancel`] was called.
    #[error("context cancelled")]
    Cancelled,
}

/// Deadline and cancellation state shared by all work done for one request
///
/// Clones share the cancellation flag, so cancelling any clone cancels all.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    /// A context that never expires on its own
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Marks this context and all of its clones as cancelled
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns why the context is done, or `None` while it is still live
    ///
    /// Cancellation takes precedence over an expired deadline.
    pub fn error(&self) -> Option<ContextError> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drives `future` to completion unless the deadline passes first
    ///
    /// A context that is already done fails immediately without polling the
    /// future.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        if let Some(error) = self.error() {
            return Err(error);
        }
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, future)
                .await
                .map_err(|_| ContextError::DeadlineExceeded),
            None => Ok(future.await),
        }
    }
}
