// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Sync committee duty result types

use serde::{Deserialize, Serialize};

/// Public keys of the sync committee members on duty for a slot
///
/// The order follows the committee member indices as returned by the beacon
/// node. The list is empty for slots that predate the Altair fork.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncDuties {
    /// Validator public keys, hex encoded
    pub validators: Vec<String>,
}

impl SyncDuties {
    pub fn new(validators: Vec<String>) -> Self {
        Self { validators }
    }

    /// Duties for a slot without a sync committee
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
