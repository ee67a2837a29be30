// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`BeaconClient`] over HTTP with `reqwest`

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{
    sync_committee_path, validators_path, BeaconClient, BeaconResponse, Envelope, HeaderData,
};
use crate::errors::RpcError;
use crate::types::Slot;

const HEAD_HEADER_PATH: &str = "/eth/v1/beacon/headers/head";

/// Beacon node REST client
///
/// # Examples
///
/// ```rust,no_run
/// use slotscan::HttpBeaconClient;
/// use std::time::Duration;
///
/// let client = HttpBeaconClient::new("http://localhost:5052", Duration::from_secs(10))?;
/// # Ok::<(), slotscan::RpcError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpBeaconClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBeaconClient {
    /// Creates a client whose every request is bounded by `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| RpcError::ProviderUrlInvalid(format!("{base_url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::beacon_request_failed(&base_url, e))?;

        Ok(Self::with_client(base_url, http))
    }

    /// Uses an already configured `reqwest` client
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<BeaconResponse, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(path, e))?;

        debug!(path, status, body_len = body.len(), "Beacon API response");
        Ok(BeaconResponse { status, body })
    }
}

fn transport_error(path: &str, error: reqwest::Error) -> RpcError {
    if error.is_timeout() {
        RpcError::RequestTimedOut {
            endpoint: path.to_string(),
        }
    } else {
        RpcError::beacon_request_failed(path, error)
    }
}

#[async_trait]
impl BeaconClient for HttpBeaconClient {
    async fn head_slot(&self) -> Result<Slot, RpcError> {
        let response = self.get(HEAD_HEADER_PATH).await?;
        if response.is_transient() {
            return Err(RpcError::TransientStatus {
                endpoint: HEAD_HEADER_PATH.to_string(),
                status: response.status,
            });
        }
        if !response.is_success() {
            return Err(RpcError::UnexpectedStatus {
                endpoint: HEAD_HEADER_PATH.to_string(),
                status: response.status,
            });
        }

        let envelope: Envelope<HeaderData> = serde_json::from_str(&response.body)
            .map_err(|e| RpcError::decode_failed(HEAD_HEADER_PATH, e))?;
        envelope
            .data
            .header
            .message
            .slot
            .parse::<Slot>()
            .map_err(|e| RpcError::decode_failed(HEAD_HEADER_PATH, e))
    }

    async fn sync_committee(&self, slot: Slot) -> Result<BeaconResponse, RpcError> {
        self.get(&sync_committee_path(slot)).await
    }

    async fn validators(
        &self,
        slot: Slot,
        indices: &[String],
    ) -> Result<BeaconResponse, RpcError> {
        self.get(&validators_path(slot, indices)).await
    }
}
