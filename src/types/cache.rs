// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache metadata types

/// Monotonic sequence number for deterministic LRU ordering
///
/// Every read hit and every insertion stamps the touched entry with a fresh
/// sequence number. The entry holding the lowest number is the least recently
/// used one, so eviction never depends on clock resolution.
///
/// # Examples
///
/// ```
/// use slotscan::AccessSequence;
///
/// let seq1 = AccessSequence::default();
/// let seq2 = seq1.next();
/// assert!(seq1 < seq2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct AccessSequence(u64);

impl AccessSequence {
    /// Returns the next sequence number
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
