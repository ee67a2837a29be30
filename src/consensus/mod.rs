// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Consensus layer access and sync-committee duty resolution
//!
//! - [`BeaconClient`]: the beacon REST calls duty resolution needs
//! - [`HttpBeaconClient`]: implementation over `reqwest`
//! - [`DutyResolver`]: maps a slot to the public keys of its sync committee
//!
//! Committee and validator lookups hand back the raw status and body so that
//! all status classification happens in one place, the resolver.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::RpcError;
use crate::types::Slot;

mod http;
mod resolver;

pub use http::HttpBeaconClient;
pub use resolver::DutyResolver;

/// Beacon API path for the sync committee of a state
pub fn sync_committee_path(slot: Slot) -> String {
    format!("/eth/v1/beacon/states/{slot}/sync_committees")
}

/// Beacon API path for a set of validators of a state
pub fn validators_path(slot: Slot, indices: &[String]) -> String {
    format!(
        "/eth/v1/beacon/states/{slot}/validators?id={}",
        indices.join(",")
    )
}

/// Raw HTTP outcome of a beacon API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconResponse {
    pub status: u16,
    pub body: String,
}

impl BeaconResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Server errors and rate limiting, which are worth another attempt
    pub fn is_transient(&self) -> bool {
        self.status == 429 || (500..600).contains(&self.status)
    }
}

/// Read-only consensus layer capabilities
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as one client is shared by all requests.
#[async_trait]
pub trait BeaconClient: Send + Sync {
    /// Slot of the current head block
    async fn head_slot(&self) -> Result<Slot, RpcError>;

    /// `GET /eth/v1/beacon/states/{slot}/sync_committees`
    async fn sync_committee(&self, slot: Slot) -> Result<BeaconResponse, RpcError>;

    /// `GET /eth/v1/beacon/states/{slot}/validators?id=...`
    async fn validators(
        &self,
        slot: Slot,
        indices: &[String],
    ) -> Result<BeaconResponse, RpcError>;
}

/// Beacon API envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncCommitteeData {
    pub validators: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorRecord {
    pub index: String,
    pub validator: ValidatorKey,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorKey {
    pub pubkey: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeaderData {
    pub header: SignedHeader,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignedHeader {
    pub message: HeaderMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeaderMessage {
    pub slot: String,
}
