// src/fetch/delay.rs
// =============================================================================
// A fetcher wrapper that makes every fetch slow, and unpredictably so.
//
// Wrapping a StaticFetcher in a DelayedFetcher turns an instant table lookup
// into something that behaves more like a network: each call sleeps for a
// base latency plus a random jitter before delegating. Tasks then finish in
// a different order on every run, which is what the race and completion
// tests need.
// =============================================================================

use super::{FetchError, Fetcher, Page};
use crate::node::NodeId;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DelayedFetcher<F> {
    inner: F,
    base: Duration,
    jitter: Duration,
}

impl<F: Fetcher> DelayedFetcher<F> {
    pub fn new(inner: F, base: Duration, jitter: Duration) -> Self {
        DelayedFetcher { inner, base, jitter }
    }

    // Only random jitter, no fixed latency
    pub fn with_jitter(inner: F, jitter: Duration) -> Self {
        Self::new(inner, Duration::ZERO, jitter)
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn next_delay(&self) -> Duration {
        let max_micros = self.jitter.as_micros() as u64;
        if max_micros == 0 {
            return self.base;
        }
        // thread_rng is not Send, so it must not live across the sleep below
        let extra = rand::thread_rng().gen_range(0..=max_micros);
        self.base + Duration::from_micros(extra)
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for DelayedFetcher<F> {
    async fn fetch(&self, id: &NodeId) -> Result<Page, FetchError> {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.inner.fetch(id).await
    }
}
