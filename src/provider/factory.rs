// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider factory for the execution layer client

use alloy_provider::ProviderBuilder;
use alloy_rpc_client::ClientBuilder;
use alloy_transport_http::Http;

use crate::errors::RpcError;
use crate::transport::LoggingLayer;

use super::config::ProviderConfig;
use super::HttpProvider;

/// Create an HTTP provider with the given configuration
///
/// Recommended fillers are disabled, so the result is a bare
/// [`RootProvider`](alloy_provider::RootProvider): slot queries never send
/// transactions.
///
/// # Examples
///
/// ```rust
/// use slotscan::provider::{create_http_provider, ProviderConfig};
/// use std::time::Duration;
///
/// let provider = create_http_provider(
///     ProviderConfig::new("http://localhost:8545").with_timeout(Duration::from_secs(5))
/// )?;
/// # Ok::<(), slotscan::RpcError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The URL cannot be parsed
/// - The HTTP client cannot be built
pub fn create_http_provider(config: ProviderConfig) -> Result<HttpProvider, RpcError> {
    let url: url::Url = config
        .url
        .parse()
        .map_err(|e| RpcError::ProviderUrlInvalid(format!("{}: {e}", config.url)))?;

    let mut http_client = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        http_client = http_client.timeout(timeout);
    }
    let http_client = http_client
        .build()
        .map_err(|e| RpcError::ProviderUrlInvalid(format!("{}: {e}", config.url)))?;

    let transport = Http::with_client(http_client, url);
    let is_local = transport.guess_local();

    let client = if config.logging_enabled {
        let mut layer = LoggingLayer::new();
        if let Some(threshold) = config.slow_call_threshold {
            layer = layer.with_slow_call_threshold(threshold);
        }
        ClientBuilder::default()
            .layer(layer)
            .transport(transport, is_local)
    } else {
        ClientBuilder::default().transport(transport, is_local)
    };

    Ok(ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_client(client))
}
