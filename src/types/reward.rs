// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block reward result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the proposer of a slot earned its reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    /// Block built locally through the baseline protocol path
    Vanilla,
    /// Block delivered by a known MEV builder or relay
    Mev,
}

impl RewardStatus {
    /// Wire name of the status (`"vanilla"` or `"mev"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vanilla => "vanilla",
            Self::Mev => "mev",
        }
    }
}

impl fmt::Display for RewardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reward received by the proposer of a slot
///
/// Serialized as `{"status": "vanilla" | "mev", "reward_gwei": <number>}`.
///
/// # Examples
///
/// ```
/// use slotscan::{BlockReward, RewardStatus};
///
/// let reward = BlockReward::genesis();
/// assert_eq!(reward.status, RewardStatus::Vanilla);
/// assert_eq!(reward.reward_gwei, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockReward {
    /// MEV classification of the block
    pub status: RewardStatus,
    /// Fee recipient balance change over the slot, in gwei
    pub reward_gwei: f64,
}

impl BlockReward {
    pub fn new(status: RewardStatus, reward_gwei: f64) -> Self {
        Self {
            status,
            reward_gwei,
        }
    }

    /// Reward reported for the genesis slot, which has no proposer
    pub fn genesis() -> Self {
        Self::new(RewardStatus::Vanilla, 0.0)
    }
}
