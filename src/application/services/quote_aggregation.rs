//! # Quote Aggregation Engine
//!
//! Orchestrates quote collection and the statistics built on it.
//!
//! This module provides the [`QuoteAggregationEngine`] which coordinates
//! concurrent collection from every configured source, tolerates partial
//! failure, and computes the cross-source average and per-source slippage.

use crate::application::services::quote_cache::{CacheStatus, QuoteCache};
use crate::application::services::retry::{RetryExhausted, RetryOutcome, RetryPolicy};
use crate::domain::entities::{Average, Quote, Slippage};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::{compute_average, compute_slippage};
use crate::domain::value_objects::SourceId;
use crate::infrastructure::sources::traits::SourceAdapter;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

/// A source that produced no quote in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    /// The failing source.
    pub source: SourceId,
    /// Last error message.
    pub error: String,
    /// Attempts made before giving up.
    pub attempts: u32,
}

impl From<RetryExhausted> for SourceFailure {
    fn from(exhausted: RetryExhausted) -> Self {
        Self {
            source: exhausted.source_id,
            error: exhausted.last_error,
            attempts: exhausted.attempts,
        }
    }
}

/// Outcome of one collection round.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionResult {
    /// Validated quotes, in adapter order.
    pub quotes: Vec<Quote>,
    /// Sources that failed, in adapter order.
    pub failures: Vec<SourceFailure>,
}

impl CollectionResult {
    /// Returns true if at least one source failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Error type for aggregation operations.
#[derive(Debug, Clone, Error)]
pub enum AggregationError {
    /// The engine has no adapters.
    #[error("no quote sources configured")]
    NoSourcesConfigured,

    /// Every adapter failed.
    #[error("all sources failed: {}", describe_failures(.0))]
    AllSourcesFailed(Vec<SourceFailure>),

    /// Statistics could not be computed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn describe_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.source, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for aggregation operations.
pub type AggregationResult<T> = Result<T, AggregationError>;

/// Engine for collecting quotes from multiple sources.
#[derive(Debug)]
pub struct QuoteAggregationEngine {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    retry: RetryPolicy,
    cache: Option<Arc<QuoteCache>>,
}

impl QuoteAggregationEngine {
    /// Creates a new engine without a cache.
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, retry: RetryPolicy) -> Self {
        Self {
            adapters,
            retry,
            cache: None,
        }
    }

    /// Attaches a cache consulted by [`collect`](Self::collect).
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<QuoteCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the configured source ids, in adapter order.
    #[must_use]
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.adapters.iter().map(|a| a.source_id().clone()).collect()
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the cache status, if a cache is attached.
    #[must_use]
    pub fn cache_status(&self) -> Option<CacheStatus> {
        self.cache.as_ref().map(|c| c.status())
    }

    /// Collects one quote per source concurrently.
    ///
    /// Every source is awaited to completion. Partial failure is reported
    /// through [`CollectionResult::failures`]. Dropping the returned future
    /// cancels sources that are still retrying.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sources are configured
    /// - Every source failed
    pub async fn collect(&self) -> AggregationResult<CollectionResult> {
        if self.adapters.is_empty() {
            return Err(AggregationError::NoSourcesConfigured);
        }

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get()) {
            tracing::debug!(quotes = cached.quotes.len(), "serving cached collection");
            return Ok(cached);
        }

        let outcomes = self.run_sources().await;

        let mut quotes = Vec::with_capacity(self.adapters.len());
        let mut failures = Vec::new();

        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            match outcome {
                Some(Ok(success)) => quotes.push(success.quote),
                Some(Err(failure)) => failures.push(failure),
                None => failures.push(SourceFailure {
                    source: adapter.source_id().clone(),
                    error: "task did not complete".to_string(),
                    attempts: 0,
                }),
            }
        }

        if quotes.is_empty() {
            tracing::error!(failures = failures.len(), "all sources failed");
            return Err(AggregationError::AllSourcesFailed(failures));
        }

        if !failures.is_empty() {
            tracing::warn!(
                quotes = quotes.len(),
                failures = failures.len(),
                failed = %describe_failures(&failures),
                "partial collection"
            );
        } else {
            tracing::info!(quotes = quotes.len(), "collection complete");
        }

        let result = CollectionResult { quotes, failures };
        if let Some(cache) = &self.cache {
            cache.store(result.clone());
        }
        Ok(result)
    }

    /// Runs the retry policy for every adapter on its own task.
    ///
    /// Outcomes are returned in adapter order. The tasks live in a
    /// [`JoinSet`], so dropping this future aborts any source still retrying.
    async fn run_sources(&self) -> Vec<Option<Result<RetryOutcome, SourceFailure>>> {
        let mut tasks = JoinSet::new();
        let mut index_of = HashMap::with_capacity(self.adapters.len());

        for (index, adapter) in self.adapters.iter().enumerate() {
            let adapter = Arc::clone(adapter);
            let retry = self.retry;
            let handle = tasks.spawn(async move { retry.execute(adapter.as_ref()).await });
            index_of.insert(handle.id(), index);
        }

        let mut outcomes: Vec<Option<Result<RetryOutcome, SourceFailure>>> =
            self.adapters.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, result)) => (id, result.map_err(SourceFailure::from)),
                Err(join_error) => {
                    let id = join_error.id();
                    let Some(adapter) = index_of.get(&id).and_then(|&i| self.adapters.get(i))
                    else {
                        continue;
                    };
                    let failure = SourceFailure {
                        source: adapter.source_id().clone(),
                        error: format!("task failed: {join_error}"),
                        attempts: 0,
                    };
                    (id, Err(failure))
                }
            };
            if let Some(slot) = index_of.get(&id).and_then(|&i| outcomes.get_mut(i)) {
                *slot = Some(outcome);
            }
        }

        outcomes
    }

    /// Averages buy and sell prices across quotes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyQuoteSet` if `quotes` is empty.
    pub fn average(&self, quotes: &[Quote]) -> DomainResult<Average> {
        compute_average(quotes)
    }

    /// Computes each quote's deviation from the average.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DivisionByZero` if an average price is zero.
    pub fn slippage(&self, quotes: &[Quote], average: &Average) -> DomainResult<Vec<Slippage>> {
        compute_slippage(quotes, average)
    }

    /// Collects quotes and averages them.
    ///
    /// # Errors
    ///
    /// Returns any collection or statistics error.
    pub async fn collect_average(&self) -> AggregationResult<Average> {
        let collection = self.collect().await?;
        Ok(self.average(&collection.quotes)?)
    }

    /// Collects quotes and computes slippage against their average.
    ///
    /// # Errors
    ///
    /// Returns any collection or statistics error.
    pub async fn collect_slippage(&self) -> AggregationResult<Vec<Slippage>> {
        let collection = self.collect().await?;
        let average = self.average(&collection.quotes)?;
        Ok(self.slippage(&collection.quotes, &average)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::retry::tests::{quote, ScriptedSource};
    use crate::application::services::retry::RetryConfig;
    use crate::domain::value_objects::ValidationProfile;
    use crate::infrastructure::sources::error::{SourceError, SourceResult};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::time::Duration;
    use tokio::time::Instant;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(RetryConfig::new(2, Duration::from_millis(1)))
    }

    fn ok(id: &str, buy: i64, sell: i64) -> Arc<dyn SourceAdapter> {
        Arc::new(ScriptedSource::new(id, vec![Ok(quote(id, buy, sell))]))
    }

    fn down(id: &str) -> Arc<dyn SourceAdapter> {
        Arc::new(ScriptedSource::new(
            id,
            vec![
                Err(SourceError::connection("refused")),
                Err(SourceError::connection("refused again")),
            ],
        ))
    }

    #[derive(Debug)]
    struct PanickingSource(SourceId);

    #[async_trait]
    impl SourceAdapter for PanickingSource {
        fn source_id(&self) -> &SourceId {
            &self.0
        }

        fn name(&self) -> &str {
            "panicking"
        }

        fn validation_profile(&self) -> ValidationProfile {
            ValidationProfile::brl_per_usd(Default::default())
        }

        #[allow(clippy::panic)]
        async fn fetch(&self) -> SourceResult<Quote> {
            panic!("adapter bug")
        }
    }

    #[tokio::test]
    async fn partial_success_returns_quotes_and_failures() {
        let engine = QuoteAggregationEngine::new(vec![ok("a", 51000, 50000), down("b")], policy());

        let result = engine.collect().await.unwrap();
        assert_eq!(result.quotes.len(), 1);
        assert!(result.is_partial());
        assert_eq!(result.failures[0].source.as_str(), "b");
        assert_eq!(result.failures[0].attempts, 2);
        assert!(result.failures[0].error.contains("refused again"));
    }

    #[tokio::test]
    async fn all_failed_names_every_source() {
        let engine = QuoteAggregationEngine::new(vec![down("a"), down("b")], policy());

        let err = engine.collect().await.unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, AggregationError::AllSourcesFailed(ref f) if f.len() == 2));
        assert!(message.contains("a (") && message.contains("b ("));
    }

    #[tokio::test]
    async fn no_adapters_is_an_error() {
        let engine = QuoteAggregationEngine::new(Vec::new(), policy());
        assert!(matches!(
            engine.collect().await.unwrap_err(),
            AggregationError::NoSourcesConfigured
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn quotes_keep_adapter_order() {
        let slow: Arc<dyn SourceAdapter> = Arc::new(
            ScriptedSource::new("slow", vec![Ok(quote("slow", 51000, 50000))])
                .with_delay(Duration::from_millis(500)),
        );
        let engine = QuoteAggregationEngine::new(vec![slow, ok("fast", 52000, 51000)], policy());

        let result = engine.collect().await.unwrap();
        let ids: Vec<_> = result.quotes.iter().map(|q| q.source().as_str().to_string()).collect();
        assert_eq!(ids, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn panicking_adapter_is_recorded_as_failure() {
        let engine = QuoteAggregationEngine::new(
            vec![ok("a", 51000, 50000), Arc::new(PanickingSource(SourceId::new("p")))],
            policy(),
        );

        let result = engine.collect().await.unwrap();
        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.failures[0].source.as_str(), "p");
        assert!(result.failures[0].error.starts_with("task failed"));
    }

    #[tokio::test]
    async fn collect_average_and_slippage() {
        let engine = QuoteAggregationEngine::new(
            vec![ok("a", 50000, 49000), ok("b", 52000, 51000)],
            policy(),
        );

        let average = engine.collect_average().await.unwrap();
        assert_eq!(average.average_buy_price(), Decimal::new(51000, 4));
        assert_eq!(average.average_sell_price(), Decimal::new(50000, 4));
        assert_eq!(average.sources_count(), 2);
    }

    #[tokio::test]
    async fn slippage_is_one_per_quote() {
        let engine = QuoteAggregationEngine::new(
            vec![ok("a", 50000, 49000), ok("b", 52000, 51000), down("c")],
            policy(),
        );

        let slippage = engine.collect_slippage().await.unwrap();
        assert_eq!(slippage.len(), 2);
        assert_eq!(slippage[0].buy_price_slippage_pct(), Decimal::new(-196, 2));
        assert_eq!(slippage[1].buy_price_slippage_pct(), Decimal::new(196, 2));
    }

    #[test]
    fn average_of_nothing_is_an_error() {
        let engine = QuoteAggregationEngine::new(Vec::new(), policy());
        assert_eq!(engine.average(&[]).unwrap_err(), DomainError::EmptyQuoteSet);
    }

    #[tokio::test]
    async fn cache_serves_second_collection() {
        let source = Arc::new(ScriptedSource::new("a", vec![Ok(quote("a", 51000, 50000))]));
        let adapter: Arc<dyn SourceAdapter> = source.clone();
        let engine = QuoteAggregationEngine::new(vec![adapter], policy())
            .with_cache(Arc::new(QuoteCache::new(Duration::from_secs(60))));

        engine.collect().await.unwrap();
        let second = engine.collect().await.unwrap();
        assert_eq!(second.quotes.len(), 1);
        assert_eq!(source.calls(), 1);
        assert!(engine.cache_status().unwrap().has_entry);
    }

    #[tokio::test]
    async fn failed_collection_is_not_cached() {
        let cache = Arc::new(QuoteCache::new(Duration::from_secs(60)));
        let engine =
            QuoteAggregationEngine::new(vec![down("a")], policy()).with_cache(Arc::clone(&cache));

        assert!(engine.collect().await.is_err());
        assert!(!cache.status().has_entry);
    }

    #[tokio::test(start_paused = true)]
    async fn backoffs_of_different_sources_overlap() {
        let flaky = |id: &str| -> Arc<dyn SourceAdapter> {
            Arc::new(ScriptedSource::new(
                id,
                vec![Err(SourceError::connection("reset")), Ok(quote(id, 51000, 50000))],
            ))
        };
        let engine = QuoteAggregationEngine::new(
            vec![flaky("a"), flaky("b"), flaky("c")],
            RetryPolicy::default(),
        );

        let started = Instant::now();
        let result = engine.collect().await.unwrap();

        // one 2 s backoff per source, all running at the same time
        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(result.quotes.len(), 3);
        assert!(!result.is_partial());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_collect_cancels_pending_retries() {
        let source = Arc::new(ScriptedSource::new("down", Vec::new()));
        let adapter: Arc<dyn SourceAdapter> = source.clone();
        let engine = QuoteAggregationEngine::new(vec![adapter], RetryPolicy::default());

        let caller = tokio::time::timeout(Duration::from_millis(500), engine.collect()).await;
        assert!(caller.is_err());
        let calls_at_drop = source.calls();
        assert_eq!(calls_at_drop, 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.calls(), calls_at_drop);
    }
}
