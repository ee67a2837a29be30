// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider configuration options

use std::time::Duration;

/// Configuration for creating the execution layer provider
///
/// # Example
///
/// ```rust
/// use slotscan::provider::ProviderConfig;
/// use std::time::Duration;
///
/// let config = ProviderConfig::new("http://localhost:8545")
///     .with_timeout(Duration::from_secs(5));
/// assert!(config.logging_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL
    pub url: String,
    /// HTTP timeout applied to every JSON-RPC request (None for the client default)
    pub timeout: Option<Duration>,
    /// Wrap the transport in [`LoggingLayer`](crate::transport::LoggingLayer)
    pub logging_enabled: bool,
    /// Calls slower than this are logged at `warn`
    pub slow_call_threshold: Option<Duration>,
}

impl ProviderConfig {
    /// Create a new provider configuration with the specified URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            logging_enabled: true,
            slow_call_threshold: None,
        }
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn without_logging(mut self) -> Self {
        self.logging_enabled = false;
        self
    }

    #[must_use]
    pub fn with_slow_call_threshold(mut self, threshold: Duration) -> Self {
        self.slow_call_threshold = Some(threshold);
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}
