// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for slotscan integration tests
//!
//! Provides mock upstream clients and beacon API response bodies so resolvers,
//! use cases and the HTTP API can be exercised without real nodes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use slotscan::{
    BeaconClient, BeaconResponse, ExecutionClient, RpcError, Slot, SlotHeader, WeiAmount,
};

/// Mock ExecutionClient with a fixed head and per-slot headers and balances
///
/// Slots without a header answer [`RpcError::HeaderNotFound`]; slots without
/// a balance answer zero.
///
/// # Example
///
/// ```rust,ignore
/// let mock = MockExecutionClient::new(100)
///     .with_header(100, fee_recipient, b"beaverbuild.org")
///     .with_balance(99, 0)
///     .with_balance(100, 2_000_000_000);
/// ```
#[derive(Default)]
pub struct MockExecutionClient {
    head: Slot,
    headers: HashMap<Slot, SlotHeader>,
    balances: HashMap<Slot, U256>,
    calls: AtomicUsize,
}

impl MockExecutionClient {
    pub fn new(head: Slot) -> Self {
        Self {
            head,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, slot: Slot, fee_recipient: Address, extra_data: &[u8]) -> Self {
        self.headers.insert(
            slot,
            SlotHeader {
                fee_recipient,
                extra_data: Bytes::copy_from_slice(extra_data),
            },
        );
        self
    }

    pub fn with_balance(mut self, slot: Slot, wei: u128) -> Self {
        self.balances.insert(slot, U256::from(wei));
        self
    }

    /// Total number of upstream calls served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionClient for MockExecutionClient {
    async fn head_slot_number(&self) -> Result<Slot, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.head)
    }

    async fn header_for_slot(&self, slot: Slot) -> Result<SlotHeader, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.headers
            .get(&slot)
            .cloned()
            .ok_or(RpcError::HeaderNotFound { slot })
    }

    async fn balance_of(&self, _address: Address, slot: Slot) -> Result<WeiAmount, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .balances
            .get(&slot)
            .copied()
            .map(WeiAmount::from)
            .unwrap_or(WeiAmount::ZERO))
    }
}

/// Mock BeaconClient answering every committee and validator request with
/// one configured response
pub struct MockBeaconClient {
    head: Slot,
    committee: BeaconResponse,
    validators: BeaconResponse,
    committee_calls: AtomicUsize,
    validator_queries: Mutex<Vec<Vec<String>>>,
}

impl MockBeaconClient {
    pub fn new(head: Slot) -> Self {
        Self {
            head,
            committee: BeaconResponse::new(200, committee_body(&[])),
            validators: BeaconResponse::new(200, validators_body(&[])),
            committee_calls: AtomicUsize::new(0),
            validator_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_committee(mut self, status: u16, body: impl Into<String>) -> Self {
        self.committee = BeaconResponse::new(status, body);
        self
    }

    pub fn with_validators(mut self, status: u16, body: impl Into<String>) -> Self {
        self.validators = BeaconResponse::new(status, body);
        self
    }

    pub fn committee_calls(&self) -> usize {
        self.committee_calls.load(Ordering::SeqCst)
    }

    pub fn validator_queries(&self) -> Vec<Vec<String>> {
        self.validator_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BeaconClient for MockBeaconClient {
    async fn head_slot(&self) -> Result<Slot, RpcError> {
        Ok(self.head)
    }

    async fn sync_committee(&self, _slot: Slot) -> Result<BeaconResponse, RpcError> {
        self.committee_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.committee.clone())
    }

    async fn validators(
        &self,
        _slot: Slot,
        indices: &[String],
    ) -> Result<BeaconResponse, RpcError> {
        self.validator_queries
            .lock()
            .unwrap()
            .push(indices.to_vec());
        Ok(self.validators.clone())
    }
}

/// `GET /eth/v1/beacon/headers/head` body for `slot`
pub fn head_header_body(slot: Slot) -> Value {
    json!({
        "execution_optimistic": false,
        "finalized": false,
        "data": {
            "root": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "canonical": true,
            "header": {
                "message": {
                    "slot": slot.to_string(),
                    "proposer_index": "1",
                    "parent_root": "0x0000000000000000000000000000000000000000000000000000000000000000",
                    "state_root": "0x0000000000000000000000000000000000000000000000000000000000000000",
                    "body_root": "0x0000000000000000000000000000000000000000000000000000000000000000"
                },
                "signature": "0x00"
            }
        }
    })
}

/// Sync committee body listing `indices`
pub fn committee_body(indices: &[&str]) -> String {
    json!({
        "execution_optimistic": false,
        "data": {
            "validators": indices,
            "validator_aggregates": [indices]
        }
    })
    .to_string()
}

/// Validators body with one `(index, pubkey)` record each
pub fn validators_body(records: &[(&str, &str)]) -> String {
    let data: Vec<Value> = records
        .iter()
        .map(|(index, pubkey)| {
            json!({
                "index": index,
                "balance": "32000000000",
                "status": "active_ongoing",
                "validator": {
                    "pubkey": pubkey,
                    "withdrawal_credentials": "0x00",
                    "effective_balance": "32000000000",
                    "slashed": false
                }
            })
        })
        .collect();
    json!({ "execution_optimistic": false, "data": data }).to_string()
}

/// Error body Lighthouse returns for states before the Altair fork
pub fn pre_altair_body(slot: Slot) -> String {
    json!({
        "code": 400,
        "message": format!("BAD_REQUEST: state at slot {slot} not activated for Altair"),
        "stacktraces": []
    })
    .to_string()
}
