//! Source provider abstraction and registry
//!
//! A provider is any named capability that can answer a free-text query
//! with content. The engine ships the static characteristics table for the
//! known providers; concrete implementations are injected by the caller
//! (production code plugs in HTTP clients, tests plug in deterministic
//! fakes).

use crate::error::{EngineError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Raw content returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceContent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// External content origin
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Provider name (must be unique within a registry)
    fn name(&self) -> &str;

    /// Fetch content for a free-text query
    async fn fetch(&self, query: &str) -> Result<SourceContent>;
}

/// Static base characteristics for a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCharacteristics {
    pub name: String,
    pub base_url: String,
    /// Requests per minute the origin tolerates (informational; the
    /// aggregator enforces timeouts, not pacing)
    pub rate_limit: u32,
    pub timeout_ms: u64,
    pub reliability_score: f32,
}

impl ProviderCharacteristics {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn characteristics(
    name: &str,
    base_url: &str,
    rate_limit: u32,
    timeout_ms: u64,
    reliability_score: f32,
) -> ProviderCharacteristics {
    ProviderCharacteristics {
        name: name.to_string(),
        base_url: base_url.to_string(),
        rate_limit,
        timeout_ms,
        reliability_score,
    }
}

/// The known provider table
pub fn builtin_characteristics() -> Vec<ProviderCharacteristics> {
    vec![
        characteristics("Wikipedia", "https://en.wikipedia.org/api/rest_v1", 100, 5000, 0.9),
        characteristics("Britannica", "https://www.britannica.com/api", 50, 8000, 0.95),
        characteristics("Government of India", "https://www.india.gov.in/api", 30, 10000, 0.98),
        characteristics("PM India", "https://pmindia.gov.in/api", 20, 10000, 0.99),
        characteristics(
            "Scientific American",
            "https://www.scientificamerican.com/api",
            40,
            6000,
            0.85,
        ),
        characteristics("Nature", "https://www.nature.com/api", 25, 8000, 0.92),
        characteristics("TechCrunch", "https://techcrunch.com/api", 60, 5000, 0.8),
        characteristics("BBC News", "https://www.bbc.com/api", 50, 6000, 0.88),
        characteristics("Reuters", "https://www.reuters.com/api", 45, 7000, 0.87),
        characteristics("World Bank", "https://api.worldbank.org", 30, 10000, 0.94),
    ]
}

/// Registry of injected providers plus their static characteristics
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SourceProvider>>,
    characteristics: HashMap<String, ProviderCharacteristics>,
}

impl ProviderRegistry {
    /// Empty registry preloaded with the built-in characteristics table
    pub fn new() -> Self {
        let characteristics = builtin_characteristics()
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        Self {
            providers: HashMap::new(),
            characteristics,
        }
    }

    /// Register a provider under its own name
    pub fn register(&mut self, provider: Arc<dyn SourceProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Register a provider together with custom characteristics
    pub fn register_with(
        &mut self,
        provider: Arc<dyn SourceProvider>,
        characteristics: ProviderCharacteristics,
    ) {
        self.characteristics
            .insert(provider.name().to_string(), characteristics);
        self.register(provider);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SourceProvider>> {
        self.providers.get(name).cloned()
    }

    /// Find a registered provider whose name matches a source identifier
    /// such as an authority-list entry ("wikipedia.org" matches the
    /// "Wikipedia" provider).
    pub fn find_matching(&self, identifier: &str) -> Option<Arc<dyn SourceProvider>> {
        let identifier = identifier.to_lowercase();
        self.providers
            .values()
            .find(|p| {
                let name = p.name().to_lowercase();
                identifier.contains(&name) || name.contains(&identifier)
            })
            .cloned()
    }

    pub fn characteristics(&self, name: &str) -> Option<&ProviderCharacteristics> {
        self.characteristics.get(name)
    }

    /// Static reliability for a provider, 0.5 when unknown
    pub fn reliability(&self, name: &str) -> f32 {
        self.characteristics
            .get(name)
            .map(|c| c.reliability_score)
            .unwrap_or(0.5)
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Production provider: queries a JSON endpoint over HTTP. The response is
/// expected to carry the content under `extract`, `text` or `content`, in
/// the shape of encyclopedia summary endpoints.
pub struct HttpProvider {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait]
impl SourceProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &str) -> Result<SourceContent> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;

        let text = body
            .get("extract")
            .or_else(|| body.get("text"))
            .or_else(|| body.get("content"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::Provider(format!("{}: response carried no content", self.name))
            })?
            .to_string();

        let last_updated = body
            .get("timestamp")
            .or_else(|| body.get("last_updated"))
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));

        Ok(SourceContent {
            text,
            title: body.get("title").and_then(|v| v.as_str()).map(String::from),
            url: body
                .get("url")
                .and_then(|v| v.as_str())
                .map(String::from),
            last_updated,
            author: body.get("author").and_then(|v| v.as_str()).map(String::from),
            language: body.get("language").and_then(|v| v.as_str()).map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl SourceProvider for EchoProvider {
        fn name(&self) -> &str {
            "Wikipedia"
        }

        async fn fetch(&self, query: &str) -> Result<SourceContent> {
            Ok(SourceContent {
                text: format!("About {}", query),
                title: None,
                url: None,
                last_updated: None,
                author: None,
                language: None,
            })
        }
    }

    #[test]
    fn test_registry_lookup_and_reliability() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoProvider));

        assert!(registry.get("Wikipedia").is_some());
        assert!(registry.get("Nowhere").is_none());
        assert!((registry.reliability("Wikipedia") - 0.9).abs() < f32::EPSILON);
        assert!((registry.reliability("Nowhere") - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_find_matching_by_authority_identifier() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoProvider));

        let matched = registry.find_matching("wikipedia.org").expect("match");
        assert_eq!(matched.name(), "Wikipedia");
        assert!(registry.find_matching("nature.com").is_none());
    }

    #[tokio::test]
    async fn test_http_provider_parses_summary_shape() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "gravity".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"title":"Gravity","extract":"Gravity is a force.","timestamp":"2024-02-01T00:00:00Z"}"#,
            )
            .create_async()
            .await;

        let provider =
            HttpProvider::new("Wikipedia", server.url(), Duration::from_secs(2)).unwrap();
        let content = provider.fetch("gravity").await.unwrap();

        assert_eq!(content.text, "Gravity is a force.");
        assert_eq!(content.title.as_deref(), Some("Gravity"));
        assert!(content.last_updated.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_provider_error_on_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let provider = HttpProvider::new("Test", server.url(), Duration::from_secs(2)).unwrap();
        assert!(provider.fetch("anything").await.is_err());
    }
}
