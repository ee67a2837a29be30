// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for slotscan operations.
//!
//! Telemetry concerns are kept out of the business logic: each instrumented
//! operation has a span helper here, and the caller attaches it to the future
//! it drives.
//!
//! Usage pattern:
//! ```rust,ignore
//! use tracing::Instrument;
//!
//! pub async fn my_operation(&self, slot: Slot) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(slot))
//!     .await
//! }
//! ```

use alloy_primitives::Address;
use tracing::{Level, Span};

use crate::types::Slot;

/// Create span for a block reward resolution.
///
/// Parent: api request span or None
/// Children: fetch_balances span, JSON-RPC calls
#[inline]
pub(crate) fn resolve_block_reward(slot: Slot) -> Span {
    tracing::span!(Level::INFO, "slotscan.resolve_block_reward", slot = slot)
}

/// Create span for the two balance reads around a slot.
///
/// Parent: resolve_block_reward span
#[inline]
pub(crate) fn fetch_balances(fee_recipient: Address, slot: Slot) -> Span {
    tracing::debug_span!(
        "slotscan.fetch_balances",
        fee_recipient = %fee_recipient,
        slot = slot,
    )
}

/// Create span for a sync-committee duty resolution.
///
/// Parent: api request span or None
/// Children: fetch_validators span, beacon HTTP calls
#[inline]
pub(crate) fn resolve_sync_duties(slot: Slot) -> Span {
    tracing::span!(Level::INFO, "slotscan.resolve_sync_duties", slot = slot)
}

/// Create span for mapping committee indices to public keys.
///
/// Parent: resolve_sync_duties span
#[inline]
pub(crate) fn fetch_validators(slot: Slot, count: usize) -> Span {
    tracing::debug_span!("slotscan.fetch_validators", slot = slot, count = count)
}

/// Create span for a cached query.
///
/// Parent: http_request span or None
/// Children: resolve_block_reward or resolve_sync_duties span on a cache miss
#[inline]
pub(crate) fn execute_query(query: &'static str, slot: Slot) -> Span {
    tracing::span!(
        Level::INFO,
        "slotscan.execute_query",
        query = query,
        slot = slot,
        cache_hit = tracing::field::Empty,
    )
}

/// Create span for one HTTP request handled by the API.
///
/// Parent: None (root span for one request)
/// Children: execute_query span
#[inline]
pub(crate) fn http_request(method: &str, path: &str, request_id: &str) -> Span {
    tracing::span!(
        Level::INFO,
        "slotscan.http_request",
        method = method,
        path = path,
        request_id = request_id,
    )
}
