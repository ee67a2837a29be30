// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # slotscan
//!
//! Slot-level queries against an Ethereum node pair:
//!
//! - **Block reward**: the fee recipient's balance change across a slot, in
//!   gwei, with a vanilla/MEV classification of the block
//! - **Sync duties**: the public keys of the sync committee members on duty
//!   at a slot
//!
//! Both queries read through a bounded, expiring cache and retry their
//! upstream calls with exponential backoff inside a per-request deadline.
//!
//! ## Layout
//!
//! - [`execution`]: execution layer client and [`RewardResolver`]
//! - [`consensus`]: beacon API client and [`DutyResolver`]
//! - [`usecase`]: [`QueryUseCase`], the cache-fronted resolver
//! - [`cache`], [`retry`], [`context`]: the building blocks the above share
//! - [`api`], [`middleware`], [`bootstrap`]: the HTTP service
//!
//! ## Example
//!
//! ```rust,ignore
//! use slotscan::{
//!     BoundedFreshCache, DutyResolver, HttpBeaconClient, QueryUseCase, RequestContext,
//!     RetryPolicy,
//! };
//! use std::num::NonZeroUsize;
//! use std::time::Duration;
//!
//! let beacon = HttpBeaconClient::new("http://localhost:5052", Duration::from_secs(10))?;
//! let duties = QueryUseCase::new(
//!     "sync_duties",
//!     DutyResolver::new(beacon, RetryPolicy::default()),
//!     BoundedFreshCache::new(NonZeroUsize::new(1024).unwrap(), Duration::from_secs(3600)),
//! );
//!
//! let ctx = RequestContext::with_timeout(Duration::from_secs(10));
//! let result = duties.execute(&ctx, 9_000_000).await?;
//! println!("{} validators on duty", result.len());
//! ```

pub mod api;
pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod consensus;
pub mod context;
pub mod errors;
pub mod execution;
pub mod middleware;
pub mod provider;
pub mod retry;
pub mod transport;
pub mod types;
pub mod usecase;

mod tracing;

// Domain types
pub use types::cache::AccessSequence;
pub use types::duties::SyncDuties;
pub use types::reward::{BlockReward, RewardStatus};
pub use types::wei::{BalanceDelta, WeiAmount};
pub use types::Slot;

// Errors
pub use errors::{ConfigError, ErrorKind, RpcError, SlotscanError};

// Core building blocks
pub use cache::{BoundedFreshCache, CacheStats, SlotCache};
pub use context::{ContextError, RequestContext};
pub use retry::{retry, RetryPolicy};

// Upstream clients and resolvers
pub use consensus::{BeaconClient, BeaconResponse, DutyResolver, HttpBeaconClient};
pub use execution::{
    AlloyExecutionClient, ExecutionClient, MevClassifier, RewardResolver, SlotHeader,
};
pub use usecase::{QueryUseCase, SlotResolver};

// Configuration
pub use config::{LogFormat, QueryConfig, SlotscanConfig, SlotscanConfigBuilder};
