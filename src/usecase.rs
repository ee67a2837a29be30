// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read-through query orchestration
//!
//! A [`QueryUseCase`] pairs a [`SlotResolver`] with a [`SlotCache`]:
//!
//! 1. A cache hit is returned without touching the resolver.
//! 2. On a miss the resolver runs; its error is returned as is and nothing is
//!    cached.
//! 3. A successful result is cached, then returned.
//!
//! Concurrent misses on the same slot are not deduplicated: each one runs the
//! resolver and writes the cache.

use async_trait::async_trait;
use tracing::{debug, Instrument, Span};

use crate::cache::SlotCache;
use crate::context::RequestContext;
use crate::errors::SlotscanError;
use crate::tracing::spans;
use crate::types::Slot;

/// Computes a per-slot result
///
/// Implemented by the resolvers and by [`QueryUseCase`] itself, so the request
/// layer can hold either behind `Arc<dyn SlotResolver<Output = T>>`.
#[async_trait]
pub trait SlotResolver: Send + Sync {
    type Output: Send;

    async fn resolve(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<Self::Output, SlotscanError>;
}

/// Cache-fronted resolver
///
/// # Examples
///
/// ```rust,ignore
/// use slotscan::{BoundedFreshCache, DutyResolver, QueryUseCase, RequestContext};
///
/// let use_case = QueryUseCase::new("sync_duties", DutyResolver::new(client, policy), cache);
/// let duties = use_case.execute(&RequestContext::with_timeout(timeout), slot).await?;
/// ```
#[derive(Debug)]
pub struct QueryUseCase<R, C> {
    name: &'static str,
    resolver: R,
    cache: C,
}

impl<R, C> QueryUseCase<R, C>
where
    R: SlotResolver,
    R::Output: Clone,
    C: SlotCache<R::Output>,
{
    /// `name` labels this query in spans and logs
    pub fn new(name: &'static str, resolver: R, cache: C) -> Self {
        Self {
            name,
            resolver,
            cache,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<R::Output, SlotscanError> {
        async move {
            if let Some(cached) = self.cache.get(slot) {
                Span::current().record("cache_hit", true);
                debug!(query = self.name, slot, "Cache hit");
                return Ok(cached);
            }
            Span::current().record("cache_hit", false);

            let value = self.resolver.resolve(ctx, slot).await.map_err(|e| {
                debug!(query = self.name, slot, error = %e, "Resolution failed, not caching");
                e
            })?;

            self.cache.add(slot, value.clone());
            Ok(value)
        }
        .instrument(spans::execute_query(self.name, slot))
        .await
    }
}

#[async_trait]
impl<R, C> SlotResolver for QueryUseCase<R, C>
where
    R: SlotResolver,
    R::Output: Clone,
    C: SlotCache<R::Output>,
{
    type Output = R::Output;

    async fn resolve(
        &self,
        ctx: &RequestContext,
        slot: Slot,
    ) -> Result<Self::Output, SlotscanError> {
        self.execute(ctx, slot).await
    }
}
