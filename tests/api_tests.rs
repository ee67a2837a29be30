// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP API tests against a live router on an ephemeral port
//!
//! Upstream nodes are replaced by the mock clients in `helpers`.

mod helpers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::address;
use async_trait::async_trait;
use helpers::{committee_body, pre_altair_body, validators_body, MockBeaconClient, MockExecutionClient};
use serde_json::{json, Value};
use slotscan::api::{self, AppState};
use slotscan::{
    bootstrap, BlockReward, RequestContext, Slot, SlotResolver, SlotscanConfig,
    SlotscanConfigBuilder, SlotscanError, SyncDuties,
};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};

fn config() -> SlotscanConfig {
    SlotscanConfigBuilder::new("http://127.0.0.1:8545")
        .build()
        .unwrap()
}

async fn spawn_api(execution: MockExecutionClient, beacon: MockBeaconClient) -> SocketAddr {
    let state = bootstrap::app_state(&config(), execution, beacon);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::router(state);
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

async fn get(addr: SocketAddr, route: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{addr}{route}")).await.unwrap();
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let addr = spawn_api(MockExecutionClient::new(0), MockBeaconClient::new(0)).await;

    let (status, body) = get(addr, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn malformed_slot_is_bad_request() {
    let addr = spawn_api(MockExecutionClient::new(10), MockBeaconClient::new(10)).await;

    for route in ["/blockreward/abc", "/blockreward/-1", "/syncduties/1.5"] {
        let (status, body) = get(addr, route).await;
        assert_eq!(status, 400, "{route}");
        assert_eq!(body, json!({ "error": "invalid slot" }), "{route}");
    }
}

#[tokio::test]
async fn genesis_block_reward_is_zero() {
    let addr = spawn_api(MockExecutionClient::new(10), MockBeaconClient::new(10)).await;

    let (status, body) = get(addr, "/blockreward/0").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "vanilla", "reward_gwei": 0.0 }));
}

#[tokio::test]
async fn mev_block_reward_is_served() {
    let recipient = address!("0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5");
    let execution = MockExecutionClient::new(100)
        .with_header(100, recipient, b"beaverbuild.org")
        .with_balance(99, 1_000_000_000_000)
        .with_balance(100, 3_500_000_000_000);
    let addr = spawn_api(execution, MockBeaconClient::new(100)).await;

    let (status, body) = get(addr, "/blockreward/100").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "mev", "reward_gwei": 2500.0 }));
}

#[tokio::test]
async fn future_slot_is_bad_request() {
    let addr = spawn_api(MockExecutionClient::new(100), MockBeaconClient::new(100)).await;

    let (status, body) = get(addr, "/blockreward/101").await;
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({ "error": "slot 101 is in the future (head is 100)" })
    );

    let (status, body) = get(addr, "/syncduties/101").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "slot 101 is too far in the future" }));
}

#[tokio::test]
async fn missing_block_is_not_found() {
    let addr = spawn_api(MockExecutionClient::new(100), MockBeaconClient::new(100)).await;

    let (status, body) = get(addr, "/blockreward/50").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "slot 50 not found" }));
}

#[tokio::test]
async fn sync_duties_are_served() {
    let beacon = MockBeaconClient::new(100)
        .with_committee(200, committee_body(&["1", "2"]))
        .with_validators(200, validators_body(&[("2", "0xbbb"), ("1", "0xaaa")]));
    let addr = spawn_api(MockExecutionClient::new(100), beacon).await;

    let (status, body) = get(addr, "/syncduties/100").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "validators": ["0xaaa", "0xbbb"] }));
}

#[tokio::test]
async fn pre_altair_duties_are_empty() {
    let beacon = MockBeaconClient::new(100).with_committee(400, pre_altair_body(5));
    let addr = spawn_api(MockExecutionClient::new(100), beacon).await;

    let (status, body) = get(addr, "/syncduties/5").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "validators": [] }));
}

#[tokio::test]
async fn unclassified_failure_is_masked() {
    let beacon = MockBeaconClient::new(100)
        .with_committee(200, committee_body(&["1"]))
        .with_validators(418, "teapot");
    let addr = spawn_api(MockExecutionClient::new(100), beacon).await;

    let (status, body) = get(addr, "/syncduties/100").await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "internal error" }));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let addr = spawn_api(MockExecutionClient::new(10), MockBeaconClient::new(10)).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    let generated = response.headers().get("x-request-id").unwrap();
    assert!(!generated.is_empty());

    let response = client
        .get(format!("http://{addr}/blockreward/abc"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}

/// Resolver standing in for a defect or a hung upstream
struct MisbehavingResolver {
    started: Arc<Notify>,
    hang: bool,
}

#[async_trait]
impl SlotResolver for MisbehavingResolver {
    type Output = BlockReward;

    async fn resolve(&self, _ctx: &RequestContext, _slot: Slot) -> Result<BlockReward, SlotscanError> {
        self.started.notify_one();
        if self.hang {
            std::future::pending::<()>().await;
        }
        panic!("reward resolver bug");
    }
}

struct NoDuties;

#[async_trait]
impl SlotResolver for NoDuties {
    type Output = SyncDuties;

    async fn resolve(&self, _ctx: &RequestContext, _slot: Slot) -> Result<SyncDuties, SlotscanError> {
        Ok(SyncDuties::empty())
    }
}

fn misbehaving_state(started: Arc<Notify>, hang: bool) -> AppState {
    AppState {
        block_reward: Arc::new(MisbehavingResolver { started, hang }),
        sync_duties: Arc::new(NoDuties),
        block_reward_timeout: Duration::from_secs(3600),
        sync_duties_timeout: Duration::from_secs(3600),
    }
}

#[tokio::test]
async fn panicking_handler_answers_internal_error() {
    let state = misbehaving_state(Arc::new(Notify::new()), false);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, api::router(state)).await });

    let (status, body) = get(addr, "/blockreward/5").await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "internal error" }));

    // the server keeps serving after the panic
    let (status, _) = get(addr, "/health").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn shutdown_drain_is_bounded() {
    let started = Arc::new(Notify::new());
    let state = misbehaving_state(Arc::clone(&started), true);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(api::serve_api(
        listener,
        state,
        async move {
            let _ = stop_rx.await;
        },
        Duration::from_millis(200),
    ));

    let hung_request = tokio::spawn(reqwest::get(format!("http://{addr}/blockreward/5")));
    started.notified().await;
    stop_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop after the drain timeout")
        .unwrap();
    assert!(result.is_ok());
    hung_request.abort();
}
