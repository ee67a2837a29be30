// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for the slotscan domain.
//!
//! This module provides the result types handed back to callers and the
//! newtypes used internally while computing them:
//! - Slot numbers and the two query results ([`BlockReward`], [`SyncDuties`])
//! - Signed wei deltas with truncating gwei conversion
//! - Cache metadata (access sequences)

pub mod cache;
pub mod duties;
pub mod reward;
pub mod wei;

/// A slot number. Slot 0 is genesis.
pub type Slot = u64;

// Note: Public types are re-exported from lib.rs, not here
