// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Service wiring: configuration to clients, caches, use cases and server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{serve_api, AppState};
use crate::cache::BoundedFreshCache;
use crate::config::constants::defaults;
use crate::config::SlotscanConfig;
use crate::consensus::{BeaconClient, DutyResolver, HttpBeaconClient};
use crate::errors::RpcError;
use crate::execution::{AlloyExecutionClient, ExecutionClient, MevClassifier, RewardResolver};
use crate::provider::{create_http_provider, ProviderConfig};
use crate::usecase::QueryUseCase;

/// Assembles the handler state from already constructed upstream clients
///
/// Each query gets its own cache sized from `config`.
pub fn app_state<E, B>(config: &SlotscanConfig, execution: E, beacon: B) -> AppState
where
    E: ExecutionClient + 'static,
    B: BeaconClient + 'static,
{
    let classifier = MevClassifier::new(
        &config.mev_builder_patterns,
        config.mev_relays.iter().copied(),
    );

    let block_reward = QueryUseCase::new(
        "block_reward",
        RewardResolver::new(execution, classifier, config.block_reward.retry),
        BoundedFreshCache::new(
            config.block_reward.cache_capacity,
            config.block_reward.cache_ttl,
        ),
    );
    let sync_duties = QueryUseCase::new(
        "sync_duties",
        DutyResolver::new(beacon, config.sync_duties.retry),
        BoundedFreshCache::new(
            config.sync_duties.cache_capacity,
            config.sync_duties.cache_ttl,
        ),
    );

    AppState {
        block_reward: Arc::new(block_reward),
        sync_duties: Arc::new(sync_duties),
        block_reward_timeout: config.block_reward.timeout,
        sync_duties_timeout: config.sync_duties.timeout,
    }
}

/// Builds the HTTP clients named in `config` and assembles the handler state
pub fn build_state(config: &SlotscanConfig) -> Result<AppState, RpcError> {
    let provider = create_http_provider(
        ProviderConfig::new(&config.execution_rpc_url).with_timeout(config.block_reward.timeout),
    )?;
    let execution = AlloyExecutionClient::new(provider);
    let beacon = HttpBeaconClient::new(&config.consensus_api_url, config.sync_duties.timeout)?;

    info!(
        execution_rpc_url = %config.execution_rpc_url,
        consensus_api_url = %config.consensus_api_url,
        mev_relays = config.mev_relays.len(),
        mev_builder_patterns = config.mev_builder_patterns.len(),
        "Upstream clients ready"
    );

    Ok(app_state(config, execution, beacon))
}

/// Runs the service until Ctrl-C or SIGTERM
pub async fn run(config: SlotscanConfig) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let listener = TcpListener::bind(config.server_address).await?;
    serve_api(
        listener,
        state,
        shutdown_signal(),
        defaults::SHUTDOWN_DRAIN_TIMEOUT,
    )
    .await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
