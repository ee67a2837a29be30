// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block reward resolution
//!
//! The reward of a slot is the change in the fee recipient's balance across
//! that slot, reported in gwei:
//!
//! ```text
//! reward_gwei = trunc((balance(slot) - balance(slot - 1)) / 10^9)
//! ```
//!
//! The status is MEV when the [`MevClassifier`] recognizes the header,
//! vanilla otherwise. Slot 0 is answered locally as a vanilla zero reward.

use async_trait::async_trait;
use tracing::{debug, Instrument};

use super::{ExecutionClient, MevClassifier};
use crate::context::RequestContext;
use crate::errors::SlotscanError;
use crate::retry::{retry_upstream, RetryPolicy};
use crate::tracing::spans;
use crate::types::reward::BlockReward;
use crate::types::wei::BalanceDelta;
use crate::types::Slot;
use crate::usecase::SlotResolver;

/// Computes [`BlockReward`]s from an [`ExecutionClient`]
///
/// Every upstream call goes through the retry loop with this resolver's
/// [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RewardResolver<E> {
    client: E,
    classifier: MevClassifier,
    policy: RetryPolicy,
}

impl<E> RewardResolver<E>
where
    E: ExecutionClient,
{
    pub fn new(client: E, classifier: MevClassifier, policy: RetryPolicy) -> Self {
        Self {
            client,
            classifier,
            policy,
        }
    }

    pub fn client(&self) -> &E {
        &self.client
    }

    /// Resolves the reward for `slot`
    ///
    /// # Errors
    ///
    /// - [`SlotscanError::SlotInFuture`] if `slot` is beyond the execution head
    /// - [`SlotscanError::SlotNotFound`] if the header cannot be fetched for any
    ///   reason, an expired deadline included
    /// - [`SlotscanError::RequestTimeout`] if the deadline passes during the head
    ///   or balance reads
    /// - [`SlotscanError::Upstream`] if the head or balance reads fail otherwise
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<BlockReward, SlotscanError> {
        if slot == 0 {
            return Ok(BlockReward::genesis());
        }

        async move {
            let head = retry_upstream(ctx, &self.policy, || self.client.head_slot_number()).await?;
            if slot > head {
                debug!(slot, head, "Requested slot is beyond execution head");
                return Err(SlotscanError::SlotInFuture { slot, head });
            }

            let header = retry_upstream(ctx, &self.policy, || self.client.header_for_slot(slot))
                .await
                .map_err(|e| {
                    debug!(slot, error = %e, "Header lookup failed, treating slot as missing");
                    SlotscanError::SlotNotFound { slot }
                })?;

            let status = self.classifier.classify(&header);
            let fee_recipient = header.fee_recipient;

            let (before, after) = retry_upstream(ctx, &self.policy, || {
                self.client.balance_pair(fee_recipient, slot - 1, slot)
            })
            .await?;

            let delta = BalanceDelta::between(before, after);
            if delta.is_negative() {
                debug!(slot, %fee_recipient, "Fee recipient balance decreased across slot");
            }

            let reward = BlockReward::new(status, delta.to_gwei_truncated());
            debug!(slot, status = %reward.status, reward_gwei = reward.reward_gwei, "Resolved block reward");
            Ok(reward)
        }
        .instrument(spans::resolve_block_reward(slot))
        .await
    }
}

#[async_trait]
impl<E> SlotResolver for RewardResolver<E>
where
    E: ExecutionClient,
{
    type Output = BlockReward;

    async fn resolve(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<BlockReward, SlotscanError> {
        RewardResolver::resolve(self, ctx, slot).await
    }
}
