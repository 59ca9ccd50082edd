//! Ranked provider selection and cached, time-boxed fetching

use super::cache::{CacheStats, ResponseCache};
use super::provider::{ProviderRegistry, SourceContent, SourceProvider};
use crate::config::{AggregatorConfig, EngineConfig};
use crate::error::EngineError;
use crate::knowledge::{KnowledgeBase, KNOWLEDGE_BASE};
use crate::metrics::METRICS;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Fallback trust weights for well-known origins, checked by name substring
const DEFAULT_AUTHORITY: &[(&str, f32)] = &[
    ("wikipedia", 0.8),
    ("britannica", 0.9),
    ("government", 0.95),
    ("pm india", 0.99),
    ("scientific american", 0.85),
    ("nature", 0.92),
    ("techcrunch", 0.8),
    ("bbc", 0.88),
    ("reuters", 0.87),
    ("world bank", 0.94),
];

/// A scored response from one provider for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    pub url: String,
    pub content: String,
    pub confidence: f32,
    pub last_updated: DateTime<Utc>,
    pub authority_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Content hash, stable across cache hits
    pub fingerprint: String,
}

/// Aggregator statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    pub known_providers: usize,
    pub registered_providers: usize,
    pub average_reliability: f32,
}

/// Selects, fetches from and scores source providers
pub struct SourceAggregator {
    registry: ProviderRegistry,
    cache: ResponseCache,
    kb: Arc<KnowledgeBase>,
    config: AggregatorConfig,
}

impl SourceAggregator {
    pub fn new(registry: ProviderRegistry, config: &EngineConfig) -> Self {
        Self::with_knowledge_base(registry, KNOWLEDGE_BASE.clone(), config)
    }

    pub fn with_knowledge_base(
        registry: ProviderRegistry,
        kb: Arc<KnowledgeBase>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            registry,
            cache: ResponseCache::new(config.cache.ttl(), config.cache.max_entries),
            kb,
            config: config.aggregator.clone(),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Ranked provider subset for a domain: the fixed domain table filtered
    /// to registered providers, best reliability first, truncated.
    pub fn select_sources(&self, domain: &str, max_sources: usize) -> Vec<Arc<dyn SourceProvider>> {
        let mut providers: Vec<Arc<dyn SourceProvider>> = domain_source_names(domain)
            .iter()
            .filter_map(|name| self.registry.get(name))
            .collect();

        providers.sort_by(|a, b| {
            let ra = self.registry.reliability(a.name());
            let rb = self.registry.reliability(b.name());
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        });
        providers.truncate(max_sources);
        providers
    }

    /// Fetch one provider's answer for a query, through the cache.
    ///
    /// Never fails: provider errors and timeouts come back as
    /// zero-confidence records carrying the error text. Within the TTL
    /// window repeated calls return the identical cached record without
    /// touching the provider.
    pub async fn fetch(&self, provider: &dyn SourceProvider, query: &str) -> SourceRecord {
        let name = provider.name();

        if let Some(record) = self.cache.get(name, query) {
            METRICS.cache_hits.inc();
            return record;
        }
        METRICS.cache_misses.inc();

        let timeout = self
            .registry
            .characteristics(name)
            .map(|c| c.timeout())
            .unwrap_or_else(|| self.config.default_fetch_timeout());

        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, provider.fetch(query)).await;
        METRICS
            .fetch_duration
            .with_label_values(&[name])
            .observe(started.elapsed().as_secs_f64());

        match outcome {
            Ok(Ok(content)) => {
                let record = self.build_record(name, content);
                self.cache.store(name, query, record.clone());
                record
            }
            Ok(Err(e)) => {
                warn!("Provider {} failed for query {:?}: {}", name, query, e);
                METRICS.provider_failures.with_label_values(&[name]).inc();
                failure_record(name, e.to_string())
            }
            Err(_) => {
                let e = EngineError::Timeout(timeout);
                warn!("Provider {} timed out for query {:?}", name, query);
                METRICS.provider_failures.with_label_values(&[name]).inc();
                failure_record(name, e.to_string())
            }
        }
    }

    /// Fetch from every selected provider concurrently, discard thin
    /// records, attach domain-aware authority scores and sort by
    /// confidence.
    pub async fn fetch_many(
        &self,
        query: &str,
        domain: &str,
        max_sources: usize,
    ) -> Vec<SourceRecord> {
        let providers = self.select_sources(domain, max_sources);
        debug!(
            "Fetching {:?} from {} providers for domain {}",
            query,
            providers.len(),
            domain
        );

        let mut records =
            join_all(providers.iter().map(|p| self.fetch(p.as_ref(), query))).await;

        records.retain(|r| r.content.len() >= self.config.min_content_length);
        for record in &mut records {
            record.authority_score = self.authority_score(&record.name, domain);
        }
        records.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records
    }

    /// Trust weight for a source name: domain authority configuration
    /// first, then the known-origin table, else 0.5.
    pub fn authority_score(&self, source_name: &str, domain: &str) -> f32 {
        let name_lower = source_name.to_lowercase();

        if let Some(profile) = self.kb.profile(domain) {
            for authority in &profile.authority_sources {
                let authority_lower = authority.to_lowercase();
                if name_lower.contains(&authority_lower) || authority_lower.contains(&name_lower) {
                    return profile
                        .confidence_factors
                        .get(authority)
                        .copied()
                        .unwrap_or(0.9);
                }
            }
        }

        default_authority(&name_lower)
    }

    /// Provider table statistics
    pub fn source_stats(&self) -> SourceStats {
        let known: Vec<f32> = super::provider::builtin_characteristics()
            .iter()
            .map(|c| c.reliability_score)
            .collect();
        let average = if known.is_empty() {
            0.0
        } else {
            known.iter().sum::<f32>() / known.len() as f32
        };

        SourceStats {
            known_providers: known.len(),
            registered_providers: self.registry.len(),
            average_reliability: average,
        }
    }

    /// Response cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn build_record(&self, name: &str, content: SourceContent) -> SourceRecord {
        let reliability = self.registry.reliability(name);
        let mut confidence = reliability;

        if content.text.len() > 100 {
            confidence += 0.1;
        }
        if content.text.len() > 500 {
            confidence += 0.1;
        }
        if content.title.is_some() {
            confidence += 0.05;
        }
        if content.url.is_some() {
            confidence += 0.05;
        }
        if content.last_updated.is_some() {
            confidence += 0.05;
        }

        SourceRecord {
            name: name.to_string(),
            url: content.url.unwrap_or_default(),
            fingerprint: fingerprint(&content.text),
            content: content.text,
            confidence: confidence.min(1.0),
            last_updated: content.last_updated.unwrap_or_else(Utc::now),
            authority_score: default_authority(&name.to_lowercase()),
            error: None,
        }
    }
}

fn domain_source_names(domain: &str) -> &'static [&'static str] {
    match domain {
        "politics" => &["Wikipedia", "Government of India", "PM India", "BBC News", "Reuters"],
        "science" => &["Wikipedia", "Britannica", "Scientific American", "Nature"],
        "technology" => &["Wikipedia", "TechCrunch", "BBC News", "Reuters"],
        "geography" => &["Wikipedia", "Britannica", "World Bank", "Government of India"],
        "history" => &["Wikipedia", "Britannica", "BBC News", "Reuters"],
        _ => &["Wikipedia", "Britannica", "BBC News", "Reuters", "Scientific American"],
    }
}

fn default_authority(name_lower: &str) -> f32 {
    for (key, score) in DEFAULT_AUTHORITY {
        if name_lower.contains(key) {
            return *score;
        }
    }
    0.5
}

fn failure_record(name: &str, error: String) -> SourceRecord {
    SourceRecord {
        name: name.to_string(),
        url: String::new(),
        content: String::new(),
        confidence: 0.0,
        last_updated: Utc::now(),
        authority_score: 0.0,
        error: Some(error),
        fingerprint: fingerprint(""),
    }
}

fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::provider::ProviderCharacteristics;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        name: String,
        text: String,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new(name: &str, text: &str) -> Self {
            Self {
                name: name.to_string(),
                text: text.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SourceProvider for CountingProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch(&self, _query: &str) -> crate::error::Result<SourceContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SourceContent {
                text: self.text.clone(),
                title: Some("title".to_string()),
                url: Some("https://en.wikipedia.org/wiki/x".to_string()),
                last_updated: Some(Utc::now()),
                author: None,
                language: Some("en".to_string()),
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SourceProvider for FailingProvider {
        fn name(&self) -> &str {
            "Reuters"
        }

        async fn fetch(&self, _query: &str) -> crate::error::Result<SourceContent> {
            Err(EngineError::Provider("connection refused".to_string()))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl SourceProvider for SlowProvider {
        fn name(&self) -> &str {
            "Sloth"
        }

        async fn fetch(&self, _query: &str) -> crate::error::Result<SourceContent> {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok(SourceContent {
                text: "too late".to_string(),
                title: None,
                url: None,
                last_updated: None,
                author: None,
                language: None,
            })
        }
    }

    const LONG_TEXT: &str = "Gravity is the force by which a planet or other body draws objects toward its center, keeping planets in orbit.";

    #[tokio::test]
    async fn test_fetch_is_cached_within_ttl() {
        let provider = Arc::new(CountingProvider::new("Wikipedia", LONG_TEXT));
        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());

        let aggregator = SourceAggregator::new(registry, &EngineConfig::default());

        let first = aggregator.fetch(provider.as_ref(), "gravity").await;
        let second = aggregator.fetch(provider.as_ref(), "gravity").await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(first.error.is_none());
    }

    #[test]
    fn test_fetch_absorbs_provider_failure() {
        tokio_test::block_on(async {
            let mut registry = ProviderRegistry::new();
            let provider = Arc::new(FailingProvider);
            registry.register(provider.clone());

            let aggregator = SourceAggregator::new(registry, &EngineConfig::default());
            let record = aggregator.fetch(provider.as_ref(), "anything").await;

            assert_eq!(record.confidence, 0.0);
            assert!(record.content.is_empty());
            assert!(record.error.as_deref().unwrap_or("").contains("connection refused"));
        });
    }

    #[tokio::test]
    async fn test_fetch_times_out_slow_provider() {
        let mut registry = ProviderRegistry::new();
        let provider = Arc::new(SlowProvider);
        registry.register_with(
            provider.clone(),
            ProviderCharacteristics {
                name: "Sloth".to_string(),
                base_url: String::new(),
                rate_limit: 1,
                timeout_ms: 50,
                reliability_score: 0.9,
            },
        );

        let aggregator = SourceAggregator::new(registry, &EngineConfig::default());
        let record = aggregator.fetch(provider.as_ref(), "anything").await;

        assert_eq!(record.confidence, 0.0);
        assert!(record.error.is_some());
    }

    #[tokio::test]
    async fn test_fetch_many_filters_and_sorts() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(CountingProvider::new("Wikipedia", LONG_TEXT)));
        registry.register(Arc::new(CountingProvider::new("Britannica", "short")));
        registry.register(Arc::new(CountingProvider::new("Reuters", LONG_TEXT)));

        let aggregator = SourceAggregator::new(registry, &EngineConfig::default());
        let records = aggregator.fetch_many("gravity", "general", 5).await;

        assert_eq!(records.len(), 2, "thin record should be discarded");
        for pair in records.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        for record in &records {
            assert!(record.authority_score > 0.5);
        }
    }

    #[test]
    fn test_select_sources_ranks_by_reliability() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(CountingProvider::new("Wikipedia", "")));
        registry.register(Arc::new(CountingProvider::new("Britannica", "")));
        registry.register(Arc::new(CountingProvider::new("Nature", "")));

        let aggregator = SourceAggregator::new(registry, &EngineConfig::default());
        let selected = aggregator.select_sources("science", 2);

        assert_eq!(selected.len(), 2);
        // Britannica (0.95) outranks Nature (0.92) and Wikipedia (0.9)
        assert_eq!(selected[0].name(), "Britannica");
        assert_eq!(selected[1].name(), "Nature");
    }

    #[test]
    fn test_authority_score_fallbacks() {
        let registry = ProviderRegistry::new();
        let aggregator = SourceAggregator::new(registry, &EngineConfig::default());

        assert!(aggregator.authority_score("Wikipedia", "geography") > 0.5);
        assert!((aggregator.authority_score("Some Blog", "geography") - 0.5).abs() < f32::EPSILON);
        assert!((aggregator.authority_score("BBC News", "nonexistent") - 0.88).abs() < f32::EPSILON);
    }
}
