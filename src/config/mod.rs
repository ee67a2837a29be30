// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the slotscan service
//!
//! Settings come from the process environment, after loading a `.env` file
//! if one is present. Durations use humantime syntax (`60m`, `5s`, `100ms`).
//!
//! # Example: Loading from the environment
//!
//! ```rust,ignore
//! use slotscan::SlotscanConfig;
//!
//! let config = SlotscanConfig::from_env()?;
//! ```
//!
//! # Example: Programmatic configuration
//!
//! ```rust
//! use slotscan::SlotscanConfigBuilder;
//! use std::time::Duration;
//!
//! let config = SlotscanConfigBuilder::new("http://localhost:8545")
//!     .consensus_api_url("http://localhost:5052")
//!     .block_reward_timeout(Duration::from_secs(2))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.block_reward.timeout, Duration::from_secs(2));
//! ```

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use tracing::debug;

use crate::errors::ConfigError;
use crate::retry::RetryPolicy;

pub mod constants;

use constants::{defaults, mev::DEFAULT_BUILDER_PATTERNS};

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable multi-line output
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::invalid(
                "LOG_FORMAT",
                value,
                "expected `json` or `pretty`",
            )),
        }
    }
}

/// Cache, deadline and retry settings of one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Maximum number of cached results
    pub cache_capacity: NonZeroUsize,
    /// How long a cached result stays fresh
    pub cache_ttl: Duration,
    /// Deadline for one request, retries included
    pub timeout: Duration,
    /// Attempts and backoff for each upstream call
    pub retry: RetryPolicy,
}

impl QueryConfig {
    fn with_timeout(timeout: Duration) -> Self {
        Self {
            cache_capacity: NonZeroUsize::new(defaults::CACHE_MAX_ENTRIES)
                .unwrap_or(NonZeroUsize::MIN),
            cache_ttl: defaults::CACHE_TTL,
            timeout,
            retry: RetryPolicy::new(defaults::MAX_RETRIES, defaults::BACKOFF),
        }
    }
}

/// Configuration for the slotscan service
///
/// Use [`SlotscanConfig::from_env`] in the binary and
/// [`SlotscanConfigBuilder`] everywhere else.
#[derive(Debug, Clone)]
pub struct SlotscanConfig {
    /// Address the HTTP server listens on
    pub server_address: SocketAddr,
    /// Execution layer JSON-RPC endpoint
    pub execution_rpc_url: String,
    /// Beacon node REST base URL
    pub consensus_api_url: String,
    /// Fee recipients that mark a block as MEV
    pub mev_relays: Vec<Address>,
    /// Extra-data fragments that mark a block as MEV
    pub mev_builder_patterns: Vec<String>,
    /// Block reward query settings
    pub block_reward: QueryConfig,
    /// Sync duties query settings
    pub sync_duties: QueryConfig,
    /// Log output format
    pub log_format: LogFormat,
}

impl SlotscanConfig {
    /// Loads `.env` (if present), then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::invalid(".env", "", e)),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let execution_rpc_url = get("ETH_RPC_HTTP").ok_or(ConfigError::Missing {
            name: "ETH_RPC_HTTP",
        })?;

        let mut builder = SlotscanConfigBuilder::new(execution_rpc_url);

        if let Some(value) = get("SERVER_ADDRESS") {
            builder = builder.server_address(parse_socket_addr("SERVER_ADDRESS", &value)?);
        }
        if let Some(value) = get("CONSENSUS_API_URL") {
            builder = builder.consensus_api_url(value);
        }
        if let Some(value) = get("MEV_RELAYS") {
            builder = builder.mev_relays(parse_addresses("MEV_RELAYS", &value)?);
        }
        if let Some(value) = get("MEV_BUILDER_PATTERNS") {
            builder = builder.mev_builder_patterns(split_list(&value).map(str::to_string));
        }
        if let Some(value) = get("LOG_FORMAT") {
            builder = builder.log_format(value.parse()?);
        }

        builder.config.block_reward = read_query_config(
            &get,
            builder.config.block_reward,
            QueryVars {
                max_entries: "CACHE_BLOCK_REWARD_MAX_ENTRIES",
                ttl: "CACHE_BLOCK_REWARD_TTL",
                timeout: "BR_TIMEOUT",
                max_retries: "BR_MAX_RETRIES",
                backoff: "BR_BACKOFF",
            },
        )?;
        builder.config.sync_duties = read_query_config(
            &get,
            builder.config.sync_duties,
            QueryVars {
                max_entries: "CACHE_SYNC_MAX_ENTRIES",
                ttl: "CACHE_SYNC_TTL",
                timeout: "SD_TIMEOUT",
                max_retries: "SD_MAX_RETRIES",
                backoff: "SD_BACKOFF",
            },
        )?;

        builder.build()
    }
}

/// Environment variable names of one query's settings
struct QueryVars {
    max_entries: &'static str,
    ttl: &'static str,
    timeout: &'static str,
    max_retries: &'static str,
    backoff: &'static str,
}

fn read_query_config<G>(
    get: &G,
    mut config: QueryConfig,
    vars: QueryVars,
) -> Result<QueryConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(value) = get(vars.max_entries) {
        let entries: usize = parse_number(vars.max_entries, &value)?;
        config.cache_capacity = NonZeroUsize::new(entries).ok_or(ConfigError::BelowMinimum {
            name: vars.max_entries,
            min: 1,
        })?;
    }
    if let Some(value) = get(vars.ttl) {
        config.cache_ttl = parse_duration(vars.ttl, &value)?;
    }
    if let Some(value) = get(vars.timeout) {
        config.timeout = parse_duration(vars.timeout, &value)?;
    }
    if let Some(value) = get(vars.max_retries) {
        let max_retries: u32 = parse_number(vars.max_retries, &value)?;
        if max_retries < 1 {
            return Err(ConfigError::BelowMinimum {
                name: vars.max_retries,
                min: 1,
            });
        }
        config.retry.max_attempts = max_retries;
    }
    if let Some(value) = get(vars.backoff) {
        config.retry.base_delay = parse_duration(vars.backoff, &value)?;
    }
    Ok(config)
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_addresses(name: &'static str, value: &str) -> Result<Vec<Address>, ConfigError> {
    split_list(value)
        .map(|item| {
            item.parse::<Address>()
                .map_err(|e| ConfigError::invalid(name, item, e))
        })
        .collect()
}

fn parse_number<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(name, value, e))
}

fn parse_duration(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::invalid(name, value, e))
}

fn parse_socket_addr(name: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    // ":8080" binds every interface
    let value_with_host = if value.starts_with(':') {
        format!("0.0.0.0{value}")
    } else {
        value.to_string()
    };
    value_with_host
        .parse()
        .map_err(|e| ConfigError::invalid(name, value, e))
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Missing { name });
    }
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(name, value, e))
}

/// Builder for [`SlotscanConfig`]
///
/// Starts from the same defaults [`SlotscanConfig::from_env`] uses.
#[derive(Debug, Clone)]
pub struct SlotscanConfigBuilder {
    config: SlotscanConfig,
}

impl SlotscanConfigBuilder {
    /// `execution_rpc_url` also serves as the beacon base URL unless
    /// [`consensus_api_url`](Self::consensus_api_url) is set
    pub fn new(execution_rpc_url: impl Into<String>) -> Self {
        let execution_rpc_url = execution_rpc_url.into();
        let server_address = defaults::SERVER_ADDRESS
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)));
        Self {
            config: SlotscanConfig {
                server_address,
                consensus_api_url: execution_rpc_url.clone(),
                execution_rpc_url,
                mev_relays: Vec::new(),
                mev_builder_patterns: DEFAULT_BUILDER_PATTERNS
                    .iter()
                    .map(|pattern| pattern.to_string())
                    .collect(),
                block_reward: QueryConfig::with_timeout(defaults::BLOCK_REWARD_TIMEOUT),
                sync_duties: QueryConfig::with_timeout(defaults::SYNC_DUTIES_TIMEOUT),
                log_format: LogFormat::default(),
            },
        }
    }

    pub fn server_address(mut self, address: SocketAddr) -> Self {
        self.config.server_address = address;
        self
    }

    pub fn consensus_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.consensus_api_url = url.into();
        self
    }

    pub fn mev_relays(mut self, relays: impl IntoIterator<Item = Address>) -> Self {
        self.config.mev_relays = relays.into_iter().collect();
        self
    }

    /// Replaces the built-in builder signatures
    pub fn mev_builder_patterns(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.config.mev_builder_patterns = patterns.into_iter().collect();
        self
    }

    pub fn block_reward_cache(mut self, capacity: NonZeroUsize, ttl: Duration) -> Self {
        self.config.block_reward.cache_capacity = capacity;
        self.config.block_reward.cache_ttl = ttl;
        self
    }

    pub fn block_reward_timeout(mut self, timeout: Duration) -> Self {
        self.config.block_reward.timeout = timeout;
        self
    }

    pub fn block_reward_retry(mut self, retry: RetryPolicy) -> Self {
        self.config.block_reward.retry = retry;
        self
    }

    pub fn sync_duties_cache(mut self, capacity: NonZeroUsize, ttl: Duration) -> Self {
        self.config.sync_duties.cache_capacity = capacity;
        self.config.sync_duties.cache_ttl = ttl;
        self
    }

    pub fn sync_duties_timeout(mut self, timeout: Duration) -> Self {
        self.config.sync_duties.timeout = timeout;
        self
    }

    pub fn sync_duties_retry(mut self, retry: RetryPolicy) -> Self {
        self.config.sync_duties.retry = retry;
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.log_format = format;
        self
    }

    /// Validates and returns the configuration
    pub fn build(self) -> Result<SlotscanConfig, ConfigError> {
        let config = self.config;

        validate_url("ETH_RPC_HTTP", &config.execution_rpc_url)?;
        validate_url("CONSENSUS_API_URL", &config.consensus_api_url)?;

        if config.block_reward.retry.max_attempts < 1 {
            return Err(ConfigError::BelowMinimum {
                name: "BR_MAX_RETRIES",
                min: 1,
            });
        }
        if config.sync_duties.retry.max_attempts < 1 {
            return Err(ConfigError::BelowMinimum {
                name: "SD_MAX_RETRIES",
                min: 1,
            });
        }

        Ok(config)
    }
}
