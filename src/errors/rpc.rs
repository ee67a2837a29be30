// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared error types for upstream chain calls.
//!
//! These errors describe *how* an upstream call failed. They carry no status
//! classification of their own; the resolvers decide which of them become a
//! classified [`SlotscanError`](super::SlotscanError) and which pass through
//! as internal errors.

use alloy_primitives::Address;

use crate::types::Slot;

/// Errors that can occur while talking to the execution or consensus layer.
///
/// # Examples
///
/// ```rust
/// use slotscan::RpcError;
///
/// let error = RpcError::HeaderNotFound { slot: 42 };
/// assert_eq!(error.to_string(), "Header not found for slot 42");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Failed to fetch the current chain head.
    #[error("Failed to get current head slot")]
    GetHeadFailed {
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The header request itself failed.
    #[error("Failed to fetch header for slot {slot}")]
    GetHeaderFailed {
        /// The slot we tried to fetch
        slot: Slot,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The node answered, but has no block at this slot.
    #[error("Header not found for slot {slot}")]
    HeaderNotFound {
        /// The slot that has no block
        slot: Slot,
    },

    /// Failed to read an account balance.
    #[error("Failed to get balance of {address} at slot {slot}")]
    GetBalanceFailed {
        /// Account whose balance was requested
        address: Address,
        /// Slot the balance was requested at
        slot: Slot,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The HTTP request to the beacon node could not be completed.
    #[error("Beacon request to {endpoint} failed")]
    BeaconRequestFailed {
        /// Endpoint path that was requested
        endpoint: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The transport gave up waiting for the upstream.
    #[error("Request to {endpoint} timed out")]
    RequestTimedOut {
        /// Endpoint that timed out
        endpoint: String,
    },

    /// The upstream answered with a server error or rate limit.
    ///
    /// This is the condition the retry loop exists for.
    #[error("Transient status {status} from {endpoint}")]
    TransientStatus {
        /// Endpoint that answered
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The upstream answered with a status we have no mapping for.
    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// Endpoint that answered
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The upstream response body could not be decoded.
    #[error("Failed to decode response from {endpoint}")]
    DecodeFailed {
        /// Endpoint whose body failed to decode
        endpoint: String,
        /// The underlying decode error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured RPC URL could not be parsed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),
}

impl RpcError {
    /// Helper to create a `GetHeadFailed` error from any error type.
    pub fn get_head_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        RpcError::GetHeadFailed {
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetHeaderFailed` error from any error type.
    pub fn get_header_failed(
        slot: Slot,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetHeaderFailed {
            slot,
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBalanceFailed` error from any error type.
    pub fn get_balance_failed(
        address: Address,
        slot: Slot,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetBalanceFailed {
            address,
            slot,
            source: Box::new(source),
        }
    }

    /// Helper to create a `BeaconRequestFailed` error from any error type.
    pub fn beacon_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::BeaconRequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `DecodeFailed` error from any error type.
    pub fn decode_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::DecodeFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}
