// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use alloy_primitives::Address;

use super::SlotHeader;
use crate::config::constants::mev::DEFAULT_BUILDER_PATTERNS;
use crate::types::reward::RewardStatus;

/// Classifies a block as MEV or vanilla from its header
///
/// A block counts as MEV when its extra data contains a known builder
/// signature (case-insensitive), or when its fee recipient is one of the
/// known relay addresses.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::{Address, Bytes};
/// use slotscan::{MevClassifier, RewardStatus, SlotHeader};
///
/// let classifier = MevClassifier::new(["beaverbuild"], []);
/// let header = SlotHeader {
///     fee_recipient: Address::ZERO,
///     extra_data: Bytes::from_static(b"BeaverBuild.org"),
/// };
/// assert_eq!(classifier.classify(&header), RewardStatus::Mev);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MevClassifier {
    builder_patterns: Vec<String>,
    relays: HashSet<Address>,
}

impl MevClassifier {
    pub fn new<P, S>(builder_patterns: P, relays: impl IntoIterator<Item = Address>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let builder_patterns = builder_patterns
            .into_iter()
            .map(|pattern| pattern.as_ref().trim().to_lowercase())
            .filter(|pattern| !pattern.is_empty())
            .collect();
        Self {
            builder_patterns,
            relays: relays.into_iter().collect(),
        }
    }

    /// Classifier using the built-in builder signatures
    pub fn with_default_patterns(relays: impl IntoIterator<Item = Address>) -> Self {
        Self::new(DEFAULT_BUILDER_PATTERNS.iter().copied(), relays)
    }

    pub fn builder_patterns(&self) -> &[String] {
        &self.builder_patterns
    }

    pub fn is_relay(&self, address: &Address) -> bool {
        self.relays.contains(address)
    }

    /// Returns the builder signature found in `extra_data`, if any
    pub fn matching_pattern(&self, extra_data: &[u8]) -> Option<&str> {
        if extra_data.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(extra_data).to_lowercase();
        self.builder_patterns
            .iter()
            .find(|pattern| text.contains(pattern.as_str()))
            .map(String::as_str)
    }

    pub fn classify(&self, header: &SlotHeader) -> RewardStatus {
        if self.matching_pattern(&header.extra_data).is_some()
            || self.is_relay(&header.fee_recipient)
        {
            RewardStatus::Mev
        } else {
            RewardStatus::Vanilla
        }
    }
}
