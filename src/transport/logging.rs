// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for Alloy RPC clients.
//!
//! Every JSON-RPC call made for a slot query runs inside an `rpc_call` span
//! carrying the method name and, once finished, the duration. Calls slower
//! than the configured threshold are logged at `warn` so that upstream latency
//! eating into the request deadline is visible without debug logging.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

/// Calls slower than this are logged at `warn` unless configured otherwise
const DEFAULT_SLOW_CALL_THRESHOLD: Duration = Duration::from_secs(1);

/// A Tower layer that adds logging/tracing to RPC requests.
///
/// # Example
///
/// ```rust,ignore
/// use slotscan::transport::LoggingLayer;
/// use alloy_rpc_client::ClientBuilder;
///
/// let client = ClientBuilder::default()
///     .layer(LoggingLayer::new())
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug)]
pub struct LoggingLayer {
    /// Log request and response payloads at `trace`
    log_payloads: bool,
    slow_call_threshold: Duration,
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self {
            log_payloads: false,
            slow_call_threshold: DEFAULT_SLOW_CALL_THRESHOLD,
        }
    }
}

impl LoggingLayer {
    /// Creates a layer logging method names, timing and errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also logs full request and response payloads at `trace`.
    ///
    /// Warning: block responses make this verbose.
    pub fn with_payloads(mut self) -> Self {
        self.log_payloads = true;
        self
    }

    /// Sets the duration above which a call is logged at `warn`.
    pub fn with_slow_call_threshold(mut self, threshold: Duration) -> Self {
        self.slow_call_threshold = threshold;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            log_payloads: self.log_payloads,
            slow_call_threshold: self.slow_call_threshold,
        }
    }
}

/// A Tower service that logs RPC requests and responses.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    log_payloads: bool,
    slow_call_threshold: Duration,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let log_payloads = self.log_payloads;
        let slow_call_threshold = self.slow_call_threshold;
        let mut service = self.service.clone();
        let method = method_label(&request);

        let span = tracing::debug_span!(
            "rpc_call",
            method = %method,
            duration_ms = tracing::field::Empty,
        );
        let record_span = span.clone();

        Box::pin(
            async move {
                if log_payloads {
                    trace!(request = ?request, "RPC request");
                }

                let start = Instant::now();
                let result = service.call(request).await;
                let elapsed = start.elapsed();
                let duration_ms = elapsed.as_millis() as u64;
                record_span.record("duration_ms", duration_ms);

                match &result {
                    Ok(response) => {
                        if log_payloads {
                            trace!(response = ?response, duration_ms, "RPC response");
                        }
                        if elapsed > slow_call_threshold {
                            warn!(method = %method, duration_ms, "Slow RPC call");
                        } else {
                            debug!(method = %method, duration_ms, "RPC call completed");
                        }
                    }
                    Err(e) => {
                        warn!(method = %method, error = %e, duration_ms, "RPC call failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Method name of a single request, or a summary of a batch.
fn method_label(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [only] => only.method().to_string(),
            _ => format!("batch({} calls)", reqs.len()),
        },
    }
}
