// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Execution layer access and block reward resolution
//!
//! - [`ExecutionClient`]: the capabilities reward resolution needs from an
//!   execution node (head, header, balance)
//! - [`AlloyExecutionClient`]: implementation over an alloy [`Provider`](alloy_provider::Provider)
//! - [`MevClassifier`]: decides whether a block was built through MEV infrastructure
//! - [`RewardResolver`]: computes the proposer reward for a slot

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::errors::RpcError;
use crate::types::wei::WeiAmount;
use crate::types::Slot;

mod mev;
mod resolver;
mod rpc;

pub use mev::MevClassifier;
pub use resolver::RewardResolver;
pub use rpc::AlloyExecutionClient;

/// The header fields reward resolution looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotHeader {
    /// Address credited with the block's fees (the proposer or its builder)
    pub fee_recipient: Address,
    /// Free-form extra data; builders usually sign their blocks here
    pub extra_data: Bytes,
}

/// Read-only execution layer capabilities
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as one client is shared by all requests.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Current head block number
    async fn head_slot_number(&self) -> Result<Slot, RpcError>;

    /// Header of the block at `slot`
    ///
    /// Returns [`RpcError::HeaderNotFound`] when the node has no such block.
    async fn header_for_slot(&self, slot: Slot) -> Result<SlotHeader, RpcError>;

    /// Balance of `address` as of the end of `slot`
    async fn balance_of(&self, address: Address, slot: Slot) -> Result<WeiAmount, RpcError>;

    /// Balances of `address` at two slots, fetched concurrently
    async fn balance_pair(
        &self,
        address: Address,
        first: Slot,
        second: Slot,
    ) -> Result<(WeiAmount, WeiAmount), RpcError> {
        futures::try_join!(
            self.balance_of(address, first),
            self.balance_of(address, second)
        )
    }
}
