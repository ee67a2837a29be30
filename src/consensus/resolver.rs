// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Sync-committee duty resolution

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn, Instrument};

use super::{
    sync_committee_path, validators_path, BeaconClient, BeaconResponse, Envelope,
    SyncCommitteeData, ValidatorRecord,
};
use crate::context::RequestContext;
use crate::errors::{RpcError, SlotscanError};
use crate::retry::{retry_upstream, RetryPolicy};
use crate::tracing::spans;
use crate::types::duties::SyncDuties;
use crate::types::Slot;
use crate::usecase::SlotResolver;

/// Body fragment beacon nodes return for states before the Altair fork
const PRE_ALTAIR_MARKER: &str = "not activated for Altair";

/// Resolves the public keys of the sync committee on duty at a slot
///
/// The output keeps the order of the committee's validator indices. An index
/// the validators endpoint does not return yields an empty string at its
/// position.
#[derive(Debug, Clone)]
pub struct DutyResolver<B> {
    client: B,
    policy: RetryPolicy,
}

impl<B> DutyResolver<B>
where
    B: BeaconClient,
{
    pub fn new(client: B, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &B {
        &self.client
    }

    /// Resolves the sync duties for `slot`
    ///
    /// # Errors
    ///
    /// - [`SlotscanError::SlotTooFarInFuture`] if `slot` is beyond the consensus
    ///   head, or the committee endpoint answers 400
    /// - [`SlotscanError::SlotNotFound`] if the committee endpoint answers 404
    /// - [`SlotscanError::RequestTimeout`] if the deadline passes during any call
    /// - [`SlotscanError::Upstream`] for everything else, including server
    ///   errors that outlast the retry budget
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<SyncDuties, SlotscanError> {
        async move {
            let head = retry_upstream(ctx, &self.policy, || self.client.head_slot()).await?;
            if slot > head {
                debug!(slot, head, "Requested slot is beyond consensus head");
                return Err(SlotscanError::SlotTooFarInFuture { slot });
            }

            let committee = self.fetch_committee(ctx, slot).await?;
            if committee.is_empty() {
                return Ok(SyncDuties::empty());
            }

            let pubkeys = self
                .fetch_pubkeys(ctx, slot, &committee)
                .instrument(spans::fetch_validators(slot, committee.len()))
                .await?;

            debug!(slot, validators = pubkeys.len(), "Resolved sync duties");
            Ok(SyncDuties::new(pubkeys))
        }
        .instrument(spans::resolve_sync_duties(slot))
        .await
    }

    /// Committee member indices, or an empty list for pre-Altair slots
    async fn fetch_committee(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<Vec<String>, SlotscanError> {
        let path = sync_committee_path(slot);
        let response = retry_upstream(ctx, &self.policy, || async {
            reject_transient(&path, self.client.sync_committee(slot).await?)
        })
        .await?;

        match response.status {
            200 => {
                let envelope: Envelope<SyncCommitteeData> = serde_json::from_str(&response.body)
                    .map_err(|e| RpcError::decode_failed(&path, e))?;
                Ok(envelope.data.validators)
            }
            400 if response.body.contains(PRE_ALTAIR_MARKER) => {
                debug!(slot, "Slot predates sync committees");
                Ok(Vec::new())
            }
            400 => Err(SlotscanError::SlotTooFarInFuture { slot }),
            404 => Err(SlotscanError::SlotNotFound { slot }),
            status => Err(RpcError::UnexpectedStatus {
                endpoint: path,
                status,
            }
            .into()),
        }
    }

    /// Public keys for `indices`, in the same order
    ///
    /// A validator may sit in a committee more than once, so repeated indices
    /// repeat their key.
    async fn fetch_pubkeys(
        &self,
        ctx: &RequestContext,
        slot: Slot,
        indices: &[String],
    ) -> Result<Vec<String>, SlotscanError> {
        let path = validators_path(slot, indices);
        let response = retry_upstream(ctx, &self.policy, || async {
            reject_transient(&path, self.client.validators(slot, indices).await?)
        })
        .await?;

        if !response.is_success() {
            return Err(RpcError::UnexpectedStatus {
                endpoint: path,
                status: response.status,
            }
            .into());
        }

        let envelope: Envelope<Vec<ValidatorRecord>> = serde_json::from_str(&response.body)
            .map_err(|e| RpcError::decode_failed(&path, e))?;

        let by_index: HashMap<String, String> = envelope
            .data
            .into_iter()
            .map(|record| (record.index, record.validator.pubkey))
            .collect();

        let pubkeys = indices
            .iter()
            .map(|index| {
                by_index.get(index).cloned().unwrap_or_else(|| {
                    warn!(slot, index = %index, "No validator record for committee index");
                    String::new()
                })
            })
            .collect();
        Ok(pubkeys)
    }
}

/// Turns retry-worthy statuses into errors so the retry loop sees them
fn reject_transient(path: &str, response: BeaconResponse) -> Result<BeaconResponse, RpcError> {
    if response.is_transient() {
        return Err(RpcError::TransientStatus {
            endpoint: path.to_string(),
            status: response.status,
        });
    }
    Ok(response)
}

#[async_trait]
impl<B> SlotResolver for DutyResolver<B>
where
    B: BeaconClient,
{
    type Output = SyncDuties;

    async fn resolve(&self, ctx: &RequestContext, slot: Slot) -> Result<SyncDuties, SlotscanError> {
        DutyResolver::resolve(self, ctx, slot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Beacon fake answering from scripted queues
    #[derive(Default)]
    struct ScriptedBeacon {
        head: Slot,
        committee: Mutex<VecDeque<BeaconResponse>>,
        validators: Mutex<VecDeque<BeaconResponse>>,
        validator_queries: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedBeacon {
        fn new(head: Slot) -> Self {
            Self {
                head,
                ..Default::default()
            }
        }

        fn committee(self, status: u16, body: &str) -> Self {
            self.committee
                .lock()
                .unwrap()
                .push_back(BeaconResponse::new(status, body));
            self
        }

        fn validators(self, status: u16, body: &str) -> Self {
            self.validators
                .lock()
                .unwrap()
                .push_back(BeaconResponse::new(status, body));
            self
        }
    }

    #[async_trait]
    impl BeaconClient for ScriptedBeacon {
        async fn head_slot(&self) -> Result<Slot, RpcError> {
            Ok(self.head)
        }

        async fn sync_committee(&self, _slot: Slot) -> Result<BeaconResponse, RpcError> {
            let mut queue = self.committee.lock().unwrap();
            Ok(if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            })
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
            let mut queue = self.validators.lock().unwrap();
            Ok(if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            })
        }
    }

    fn resolver(beacon: ScriptedBeacon) -> DutyResolver<ScriptedBeacon> {
        DutyResolver::new(beacon, RetryPolicy::new(3, Duration::from_millis(10)))
    }

    fn committee_body(indices: &[&str]) -> String {
        serde_json::json!({ "data": { "validators": indices } }).to_string()
    }

    fn validators_body(records: &[(&str, &str)]) -> String {
        let data: Vec<_> = records
            .iter()
            .map(|(index, pubkey)| {
                serde_json::json!({ "index": index, "validator": { "pubkey": pubkey } })
            })
            .collect();
        serde_json::json!({ "data": data }).to_string()
    }

    #[tokio::test]
    async fn test_resolves_committee_pubkeys() {
        let beacon = ScriptedBeacon::new(100)
            .committee(200, &committee_body(&["AAA", "BBB"]))
            .validators(200, &validators_body(&[("AAA", "AAA"), ("BBB", "BBB")]));

        let duties = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap();

        assert_eq!(duties.validators, vec!["AAA", "BBB"]);
    }

    #[tokio::test]
    async fn test_output_follows_committee_order() {
        let beacon = ScriptedBeacon::new(100)
            .committee(200, &committee_body(&["3", "1", "2"]))
            .validators(
                200,
                &validators_body(&[("1", "0xone"), ("2", "0xtwo"), ("3", "0xthree")]),
            );
        let resolver = resolver(beacon);

        let duties = resolver
            .resolve(&RequestContext::background(), 50)
            .await
            .unwrap();

        assert_eq!(duties.validators, vec!["0xthree", "0xone", "0xtwo"]);
        assert_eq!(
            resolver.client().validator_queries.lock().unwrap().as_slice(),
            [vec!["3".to_string(), "1".to_string(), "2".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_unmatched_index_yields_empty_placeholder() {
        let beacon = ScriptedBeacon::new(100)
            .committee(200, &committee_body(&["1", "2"]))
            .validators(200, &validators_body(&[("2", "0xtwo")]));

        let duties = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap();

        assert_eq!(duties.validators, vec!["", "0xtwo"]);
    }

    #[tokio::test]
    async fn test_repeated_index_repeats_pubkey() {
        let beacon = ScriptedBeacon::new(100)
            .committee(200, &committee_body(&["4", "8", "4"]))
            .validators(200, &validators_body(&[("4", "0xfour"), ("8", "0xeight")]));

        let duties = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap();

        assert_eq!(duties.validators, vec!["0xfour", "0xeight", "0xfour"]);
    }

    #[tokio::test]
    async fn test_pre_altair_slot_has_no_duties() {
        let beacon = ScriptedBeacon::new(100).committee(
            400,
            r#"{"code":400,"message":"Invalid state ID: state at slot 10 not activated for Altair"}"#,
        );
        let resolver = resolver(beacon);

        let duties = resolver
            .resolve(&RequestContext::background(), 10)
            .await
            .unwrap();

        assert!(duties.is_empty());
        assert!(resolver.client().validator_queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_bad_request_is_too_far_in_future() {
        let beacon = ScriptedBeacon::new(100).committee(400, r#"{"message":"Invalid state ID"}"#);
        let error = resolver(beacon)
            .resolve(&RequestContext::background(), 10)
            .await
            .unwrap_err();

        assert!(matches!(error, SlotscanError::SlotTooFarInFuture { slot: 10 }));
    }

    #[tokio::test]
    async fn test_not_found_committee() {
        let beacon = ScriptedBeacon::new(100).committee(404, "");
        let error = resolver(beacon)
            .resolve(&RequestContext::background(), 10)
            .await
            .unwrap_err();

        assert!(matches!(error, SlotscanError::SlotNotFound { slot: 10 }));
        assert_eq!(error.status_code(), 404);
    }

    #[tokio::test]
    async fn test_slot_beyond_head() {
        let beacon = ScriptedBeacon::new(100);
        let error = resolver(beacon)
            .resolve(&RequestContext::background(), 101)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SlotscanError::SlotTooFarInFuture { slot: 101 }
        ));
    }

    #[tokio::test]
    async fn test_empty_committee_skips_validator_lookup() {
        let beacon = ScriptedBeacon::new(100).committee(200, &committee_body(&[]));
        let resolver = resolver(beacon);

        let duties = resolver
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap();

        assert_eq!(duties, SyncDuties::empty());
        assert!(resolver.client().validator_queries.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_status_is_retried() {
        let beacon = ScriptedBeacon::new(100)
            .committee(503, "")
            .committee(429, "")
            .committee(200, &committee_body(&["9"]))
            .validators(200, &validators_body(&[("9", "0xnine")]));

        let duties = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap();

        assert_eq!(duties.validators, vec!["0xnine"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_transient_status_is_unclassified() {
        let beacon = ScriptedBeacon::new(100).committee(500, "");
        let error = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SlotscanError::Upstream(RpcError::TransientStatus { status: 500, .. })
        ));
        assert_eq!(error.status_code(), 500);
    }

    #[tokio::test]
    async fn test_validators_error_status_is_unclassified() {
        let beacon = ScriptedBeacon::new(100)
            .committee(200, &committee_body(&["1"]))
            .validators(404, "");
        let error = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SlotscanError::Upstream(RpcError::UnexpectedStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_committee_body() {
        let beacon = ScriptedBeacon::new(100).committee(200, "not json");
        let error = resolver(beacon)
            .resolve(&RequestContext::background(), 100)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SlotscanError::Upstream(RpcError::DecodeFailed { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_slot_beyond_head_is_too_far_in_future(head in 0u64..u64::MAX / 2, offset in 1u64..1_000_000) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let slot = head + offset;
            let resolver = resolver(ScriptedBeacon::new(head));

            let error = runtime
                .block_on(resolver.resolve(&RequestContext::background(), slot))
                .unwrap_err();

            prop_assert!(matches!(error, SlotscanError::SlotTooFarInFuture { slot: s } if s == slot), "expected SlotTooFarInFuture");
            prop_assert!(resolver.client().validator_queries.lock().unwrap().is_empty());
        }
    }
}
