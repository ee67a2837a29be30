// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Execution layer provider construction
//!
//! The execution client is generic over `Provider`, so any alloy provider
//! works. For the service binary this module provides:
//! - [`ProviderConfig`] - URL, HTTP timeout and RPC logging settings
//! - [`create_http_provider`] - An HTTP [`RootProvider`](alloy_provider::RootProvider)
//!   with [`LoggingLayer`](crate::transport::LoggingLayer) installed
//!
//! # Examples
//!
//! ```rust,ignore
//! use slotscan::provider::{create_http_provider, ProviderConfig};
//!
//! let provider = create_http_provider(ProviderConfig::new("http://localhost:8545"))?;
//! let head = provider.get_block_number().await?;
//! ```

mod config;
mod factory;

pub use config::ProviderConfig;
pub use factory::create_http_provider;

use alloy_network::Ethereum;

/// HTTP provider for Ethereum execution nodes
pub type HttpProvider = alloy_provider::RootProvider<Ethereum>;
