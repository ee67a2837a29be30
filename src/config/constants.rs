// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Defaults and well-known values
//!
//! This module centralizes the defaults applied when an environment variable
//! is unset, and the built-in MEV builder signatures.

use std::time::Duration;

/// Environment variable defaults
pub mod defaults {
    use super::*;

    pub const SERVER_ADDRESS: &str = "0.0.0.0:8080";

    pub const CACHE_MAX_ENTRIES: usize = 1024;
    pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

    pub const BLOCK_REWARD_TIMEOUT: Duration = Duration::from_secs(5);
    pub const SYNC_DUTIES_TIMEOUT: Duration = Duration::from_secs(10);

    pub const MAX_RETRIES: u32 = 3;
    pub const BACKOFF: Duration = Duration::from_millis(100);

    /// How long in-flight requests may run after a shutdown signal
    pub const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);
}

/// MEV block builder signatures
pub mod mev {
    /// Lowercase fragments that builders write into a block's extra data
    ///
    /// Matching is a case-insensitive substring test, so `"titan"` matches
    /// both `Titan (titanbuilder.xyz)` and `titanbuilder.xyz`.
    pub const DEFAULT_BUILDER_PATTERNS: &[&str] = &[
        "flashbots",
        "builder0x69",
        "beaverbuild",
        "rsync",
        "titan",
        "bloxroute",
        "eden",
        "manifold",
        "ultrasound",
        "buildai",
        "jetbldr",
        "penguinbuild",
        "lightspeedbuilder",
        "blocknative",
    ];
}
