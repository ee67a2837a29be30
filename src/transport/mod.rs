// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for Alloy providers.
//!
//! Tower middleware for the JSON-RPC client used by the execution layer
//! client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slotscan::transport::LoggingLayer;
//! use alloy_rpc_client::ClientBuilder;
//! use alloy_provider::ProviderBuilder;
//!
//! let client = ClientBuilder::default()
//!     .layer(LoggingLayer::new())
//!     .http(rpc_url);
//!
//! let provider = ProviderBuilder::new()
//!     .disable_recommended_fillers()
//!     .connect_client(client);
//! ```

mod logging;

pub use logging::{LoggingLayer, LoggingService};
