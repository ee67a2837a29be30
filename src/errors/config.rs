// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for configuration loading.

/// Errors raised while loading or validating [`SlotscanConfig`](crate::SlotscanConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is missing or empty.
    #[error("{name} must not be empty")]
    Missing {
        /// Environment variable name
        name: &'static str,
    },

    /// A setting could not be parsed.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Environment variable name
        name: &'static str,
        /// The raw value that failed to parse
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// A setting parsed but is out of range.
    #[error("{name} must be >= {min}")]
    BelowMinimum {
        /// Environment variable name
        name: &'static str,
        /// Smallest accepted value
        min: u64,
    },
}

impl ConfigError {
    /// Create an `Invalid` error from any displayable reason.
    pub fn invalid(
        name: &'static str,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        ConfigError::Invalid {
            name,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
