// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for native currency amounts
//!
//! Balances are read from the execution layer in wei. Rewards are reported in
//! gwei, derived from the signed difference of two balances.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of wei in one gwei
const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Represents an amount of native currency (ETH) in wei
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use slotscan::WeiAmount;
///
/// let balance = WeiAmount::new(U256::from(5_000_000_000u64));
/// assert_eq!(balance.as_u256(), U256::from(5_000_000_000u64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct WeiAmount(U256);

impl WeiAmount {
    /// Zero wei amount
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn new(wei: U256) -> Self {
        Self(wei)
    }

    /// Get the inner U256 value (in wei)
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for WeiAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for WeiAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for WeiAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Signed change between two wei balances
///
/// A fee recipient may spend more than it earns within a slot, so the delta
/// can be negative. The sign is kept separately from an unsigned magnitude to
/// cover the full `U256` balance range.
///
/// # Examples
///
/// ```
/// use slotscan::{BalanceDelta, WeiAmount};
///
/// let before = WeiAmount::from(1_000_000_000u64);
/// let after = WeiAmount::from(3_500_000_000u64);
/// let delta = BalanceDelta::between(before, after);
/// assert_eq!(delta.to_gwei_truncated(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceDelta {
    magnitude: WeiAmount,
    negative: bool,
}

impl BalanceDelta {
    /// Computes `after - before`
    pub fn between(before: WeiAmount, after: WeiAmount) -> Self {
        match after.cmp(&before) {
            Ordering::Less => Self {
                magnitude: WeiAmount(before.0 - after.0),
                negative: true,
            },
            _ => Self {
                magnitude: WeiAmount(after.0 - before.0),
                negative: false,
            },
        }
    }

    pub fn magnitude(&self) -> WeiAmount {
        self.magnitude
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Converts to gwei, discarding any sub-gwei remainder
    ///
    /// Truncation is toward zero for both signs: `-1.5` gwei becomes `-1`.
    pub fn to_gwei_truncated(&self) -> f64 {
        let whole_gwei = self.magnitude.0 / U256::from(WEI_PER_GWEI);
        let value = f64::from(whole_gwei);
        if self.negative && value != 0.0 {
            -value
        } else {
            value
        }
    }
}
