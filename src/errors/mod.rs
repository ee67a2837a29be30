// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the slotscan library.
//!
//! It follows a layered approach:
//!
//! - [`RpcError`] describes how an upstream call failed, without judging it
//! - [`SlotscanError`] is what resolvers and use cases return; it carries the
//!   classification a request layer needs through [`SlotscanError::kind`] and
//!   [`SlotscanError::status_code`]
//! - [`ConfigError`] covers configuration loading and validation
//!
//! # Examples
//!
//! ```rust
//! use slotscan::{ErrorKind, SlotscanError};
//!
//! let error = SlotscanError::SlotNotFound { slot: 12 };
//! assert_eq!(error.kind(), ErrorKind::SlotNotFound);
//! assert_eq!(error.status_code(), 404);
//! ```

mod config;
mod rpc;

pub use config::ConfigError;
pub use rpc::RpcError;

use crate::context::ContextError;
use crate::types::Slot;

/// Externally visible classification of a failed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Requested slot is beyond the execution layer head
    SlotInFuture,
    /// Requested slot is beyond the consensus head, or the node says it is unreachable
    SlotTooFarInFuture,
    /// No block or committee exists for the slot
    SlotNotFound,
    /// The request deadline passed during an upstream call
    RequestTimeout,
    /// Anything not classified above
    Internal,
}

impl ErrorKind {
    /// HTTP status code hint for the request layer
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SlotInFuture | Self::SlotTooFarInFuture => 400,
            Self::SlotNotFound => 404,
            Self::RequestTimeout => 504,
            Self::Internal => 500,
        }
    }
}

/// Error returned by slot queries.
///
/// Resolvers return the most specific variant they can determine; upstream
/// failures they cannot classify travel as [`SlotscanError::Upstream`].
#[derive(Debug, thiserror::Error)]
pub enum SlotscanError {
    /// Requested slot exceeds the execution layer head.
    #[error("slot {slot} is in the future (head is {head})")]
    SlotInFuture {
        /// The requested slot
        slot: Slot,
        /// The head observed while resolving
        head: Slot,
    },

    /// Requested slot exceeds the consensus head or is flagged unreachable upstream.
    #[error("slot {slot} is too far in the future")]
    SlotTooFarInFuture {
        /// The requested slot
        slot: Slot,
    },

    /// No block or committee exists for the slot.
    #[error("slot {slot} not found")]
    SlotNotFound {
        /// The requested slot
        slot: Slot,
    },

    /// The request deadline passed during an upstream call.
    #[error("request timed out")]
    RequestTimeout,

    /// The request was cancelled by the caller.
    #[error("request cancelled")]
    Cancelled,

    /// Unclassified upstream failure.
    #[error("upstream error: {0}")]
    Upstream(#[source] RpcError),
}

impl SlotscanError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SlotInFuture { .. } => ErrorKind::SlotInFuture,
            Self::SlotTooFarInFuture { .. } => ErrorKind::SlotTooFarInFuture,
            Self::SlotNotFound { .. } => ErrorKind::SlotNotFound,
            Self::RequestTimeout => ErrorKind::RequestTimeout,
            Self::Cancelled | Self::Upstream(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status code hint for the request layer
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns true if this error carries a classification other than internal
    pub fn is_classified(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

impl From<RpcError> for SlotscanError {
    fn from(error: RpcError) -> Self {
        match error {
            RpcError::RequestTimedOut { .. } => SlotscanError::RequestTimeout,
            other => SlotscanError::Upstream(other),
        }
    }
}

impl From<ContextError> for SlotscanError {
    fn from(error: ContextError) -> Self {
        match error {
            ContextError::DeadlineExceeded => SlotscanError::RequestTimeout,
            ContextError::Cancelled => SlotscanError::Cancelled,
        }
    }
}
