// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`ExecutionClient`] over an alloy JSON-RPC provider

use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types::Block;
use async_trait::async_trait;
use tracing::{debug, Instrument};

use super::{ExecutionClient, SlotHeader};
use crate::errors::RpcError;
use crate::tracing::spans;
use crate::types::wei::WeiAmount;
use crate::types::Slot;

/// Execution client backed by any alloy [`Provider`]
///
/// Slots map one-to-one to block numbers.
///
/// # Examples
///
/// ```rust,ignore
/// use slotscan::provider::{create_http_provider, ProviderConfig};
/// use slotscan::AlloyExecutionClient;
///
/// let provider = create_http_provider(ProviderConfig::new("http://localhost:8545"))?;
/// let client = AlloyExecutionClient::new(provider);
/// ```
#[derive(Debug, Clone)]
pub struct AlloyExecutionClient<P> {
    provider: P,
}

impl<P> AlloyExecutionClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> ExecutionClient for AlloyExecutionClient<P>
where
    P: Provider + Send + Sync,
{
    async fn head_slot_number(&self) -> Result<Slot, RpcError> {
        self.provider
            .get_block_number()
            .await
            .map_err(RpcError::get_head_failed)
    }

    async fn header_for_slot(&self, slot: Slot) -> Result<SlotHeader, RpcError> {
        let block: Block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(slot))
            .await
            .map_err(|e| RpcError::get_header_failed(slot, e))?
            .ok_or(RpcError::HeaderNotFound { slot })?;

        debug!(
            slot,
            fee_recipient = %block.header.beneficiary,
            extra_data_len = block.header.extra_data.len(),
            "Fetched block header"
        );

        Ok(SlotHeader {
            fee_recipient: block.header.beneficiary,
            extra_data: block.header.extra_data.clone(),
        })
    }

    async fn balance_of(&self, address: Address, slot: Slot) -> Result<WeiAmount, RpcError> {
        self.provider
            .get_balance(address)
            .block_id(BlockId::number(slot))
            .await
            .map(WeiAmount::from)
            .map_err(|e| RpcError::get_balance_failed(address, slot, e))
    }

    async fn balance_pair(
        &self,
        address: Address,
        first: Slot,
        second: Slot,
    ) -> Result<(WeiAmount, WeiAmount), RpcError> {
        async move {
            let (before, after) = futures::try_join!(
                self.balance_of(address, first),
                self.balance_of(address, second)
            )?;
            debug!(%before, %after, "Fetched fee recipient balances");
            Ok((before, after))
        }
        .instrument(spans::fetch_balances(address, second))
        .await
    }
}
