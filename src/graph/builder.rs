//! Graph construction and fact pre-verification

use super::models::{
    ConceptRecord, FactVerification, GraphMetadata, KnowledgeEdge, KnowledgeGraph, KnowledgeNode,
};
use crate::analysis::TextAnalyzer;
use crate::error::Result;
use crate::knowledge::{DomainProfile, KnowledgeBase, KNOWLEDGE_BASE};
use crate::sources::SourceAggregator;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Provenance tag for nodes created from text extraction
const TEXT_EXTRACTION: &str = "text_extraction";

/// External concept-lookup collaborator. Optional: graph building works
/// without it, and its failures are absorbed per node.
#[async_trait]
pub trait ConceptEnrichment: Send + Sync {
    /// Provenance tag appended to enriched nodes
    fn name(&self) -> &str {
        "concept_lookup"
    }

    /// Candidate external records for an entity label
    async fn lookup(&self, label: &str) -> Result<Vec<ConceptRecord>>;
}

/// Builds one knowledge graph per verification call
pub struct GraphBuilder {
    kb: Arc<KnowledgeBase>,
    analyzer: TextAnalyzer,
    enricher: Option<Arc<dyn ConceptEnrichment>>,
    aggregator: Option<Arc<SourceAggregator>>,
}

impl GraphBuilder {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        let analyzer = TextAnalyzer::new(kb.clone());
        Self {
            kb,
            analyzer,
            enricher: None,
            aggregator: None,
        }
    }

    /// Attach a concept-enrichment collaborator
    pub fn with_enricher(mut self, enricher: Arc<dyn ConceptEnrichment>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Attach a source aggregator for authority lookups in `verify_fact`
    pub fn with_aggregator(mut self, aggregator: Arc<SourceAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Build a graph from one text: entities become nodes, relationships
    /// become edges when both endpoints exist, then each node is enriched
    /// best-effort.
    pub async fn build(&self, text: &str, domain: &str) -> KnowledgeGraph {
        debug!("Building knowledge graph for domain: {}", domain);

        let profile = self.kb.profile(domain);
        let entities = self.analyzer.extract_entities(text);

        let mut nodes: Vec<KnowledgeNode> = Vec::new();
        for entity in &entities {
            let id = KnowledgeNode::node_id(&entity.text);
            if id.is_empty() || nodes.iter().any(|n| n.id == id) {
                continue;
            }

            let mut properties = HashMap::new();
            if let Some(description) = &entity.description {
                properties.insert(
                    "description".to_string(),
                    serde_json::Value::String(description.clone()),
                );
            }
            if let Some(url) = &entity.reference_url {
                properties.insert(
                    "reference_url".to_string(),
                    serde_json::Value::String(url.clone()),
                );
            }
            if let Some(profile) = profile {
                apply_fact_patterns(profile, &entity.text, &mut properties);
            }

            nodes.push(KnowledgeNode {
                id,
                label: entity.text.clone(),
                node_type: entity.label.to_string(),
                properties,
                confidence: entity.confidence,
                sources: vec![TEXT_EXTRACTION.to_string()],
                last_updated: Utc::now(),
            });
        }

        let semantics = self.analyzer.analyze_semantics(text);
        let mut edges = Vec::new();
        for relationship in &semantics.relationships {
            let source_id = nodes
                .iter()
                .find(|n| n.label == relationship.subject)
                .map(|n| n.id.clone());
            let target_id = nodes
                .iter()
                .find(|n| n.label == relationship.object)
                .map(|n| n.id.clone());

            // Relationships whose endpoints were not extracted as entities
            // are dropped; the graph never holds dangling edges.
            let (Some(source_node_id), Some(target_node_id)) = (source_id, target_id) else {
                continue;
            };

            edges.push(KnowledgeEdge {
                source_node_id,
                target_node_id,
                relationship: relationship.predicate.clone(),
                confidence: relationship.confidence,
                evidence: vec![format!(
                    "Text: {} {} {}",
                    relationship.subject, relationship.predicate, relationship.object
                )],
            });
        }

        if let Some(enricher) = &self.enricher {
            for node in &mut nodes {
                self.enrich_node(enricher.as_ref(), node).await;
            }
        }

        let metadata = GraphMetadata {
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            domains: vec![domain.to_string()],
            last_updated: Utc::now(),
        };

        KnowledgeGraph {
            nodes,
            edges,
            metadata,
        }
    }

    /// Best-effort additive enrichment: confidence may rise and provenance
    /// is appended; existing data is never lowered or removed.
    async fn enrich_node(&self, enricher: &dyn ConceptEnrichment, node: &mut KnowledgeNode) {
        let records = match enricher.lookup(&node.label).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Enrichment failed for node {}: {}", node.label, e);
                return;
            }
        };

        let Some(record) = records.first() else {
            return;
        };

        node.properties
            .entry("description".to_string())
            .or_insert_with(|| {
                serde_json::Value::String(record.description.clone().unwrap_or_default())
            });
        if !record.aliases.is_empty() {
            node.properties.entry("aliases".to_string()).or_insert_with(|| {
                serde_json::Value::Array(
                    record
                        .aliases
                        .iter()
                        .map(|a| serde_json::Value::String(a.clone()))
                        .collect(),
                )
            });
        }

        node.confidence = (node.confidence + 0.1).min(1.0);
        let tag = enricher.name().to_string();
        if !node.sources.contains(&tag) {
            node.sources.push(tag);
        }
    }

    /// Pre-verify a single fact: domain pattern match, then best-effort
    /// authority-source confirmation. The orchestrator applies the pass
    /// threshold.
    pub async fn verify_fact(
        &self,
        fact_type: &str,
        fact_value: &str,
        domain: &str,
    ) -> FactVerification {
        let mut confidence = 0.0_f32;
        let mut supporting_sources = Vec::new();
        let mut method = "pattern_matching";

        if let Some(profile) = self.kb.profile(domain) {
            if let Some(pattern) = profile.fact_patterns.get(fact_type) {
                if pattern.is_match(fact_value) {
                    confidence += 0.3;
                    supporting_sources.push("domain_knowledge".to_string());
                }
            }

            if let Some(aggregator) = &self.aggregator {
                let value_lower = fact_value.to_lowercase();
                for authority in &profile.authority_sources {
                    let Some(provider) = aggregator.registry().find_matching(authority) else {
                        continue;
                    };

                    let record = aggregator.fetch(provider.as_ref(), fact_value).await;
                    if record.content.to_lowercase().contains(&value_lower) {
                        confidence += 0.2;
                        supporting_sources.push(record.name.clone());
                        method = "authority_source_confirmation";
                    }
                }
            }
        }

        if supporting_sources.len() > 1 {
            confidence += 0.2;
            method = "cross_source_agreement";
        }

        FactVerification {
            fact: format!("{}: {}", fact_type, fact_value),
            confidence: confidence.clamp(0.0, 1.0),
            supporting_sources,
            verification_method: method.to_string(),
        }
    }

    /// Related concepts for an entity via the enrichment collaborator.
    /// Without a collaborator this returns an empty list.
    pub async fn find_related_concepts(
        &self,
        entity: &str,
        domain: &str,
        limit: usize,
    ) -> Vec<KnowledgeNode> {
        let Some(enricher) = &self.enricher else {
            return Vec::new();
        };

        let records = match enricher.lookup(entity).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Related-concept lookup failed for {}: {}", entity, e);
                return Vec::new();
            }
        };

        let profile = self.kb.profile(domain);

        records
            .into_iter()
            .take(limit)
            .map(|record| {
                let mut properties = HashMap::new();
                if let Some(description) = &record.description {
                    properties.insert(
                        "description".to_string(),
                        serde_json::Value::String(description.clone()),
                    );
                }
                properties.insert(
                    "external_id".to_string(),
                    serde_json::Value::String(record.id.clone()),
                );
                if !record.aliases.is_empty() {
                    properties.insert(
                        "aliases".to_string(),
                        serde_json::Value::Array(
                            record
                                .aliases
                                .iter()
                                .map(|a| serde_json::Value::String(a.clone()))
                                .collect(),
                        ),
                    );
                }
                if let Some(profile) = profile {
                    apply_fact_patterns(profile, &record.label, &mut properties);
                }

                KnowledgeNode {
                    id: KnowledgeNode::node_id(&record.label),
                    label: record.label,
                    node_type: "concept".to_string(),
                    properties,
                    confidence: 0.8,
                    sources: vec![enricher.name().to_string()],
                    last_updated: Utc::now(),
                }
            })
            .collect()
    }

    pub(crate) fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(KNOWLEDGE_BASE.clone())
    }
}

/// Overlay domain fact-pattern matches into node properties
fn apply_fact_patterns(
    profile: &DomainProfile,
    label: &str,
    properties: &mut HashMap<String, serde_json::Value>,
) {
    for (fact_name, pattern) in &profile.fact_patterns {
        if let Some(caps) = pattern.captures(label) {
            if let Some(m) = caps.get(1) {
                properties.insert(
                    fact_name.clone(),
                    serde_json::Value::String(m.as_str().trim().to_string()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticEnricher;

    #[async_trait]
    impl ConceptEnrichment for StaticEnricher {
        async fn lookup(&self, label: &str) -> Result<Vec<ConceptRecord>> {
            Ok(vec![ConceptRecord {
                id: format!("Q-{}", label.len()),
                label: label.to_string(),
                description: Some(format!("About {}", label)),
                aliases: vec![],
            }])
        }
    }

    struct FailingEnricher;

    #[async_trait]
    impl ConceptEnrichment for FailingEnricher {
        async fn lookup(&self, _label: &str) -> Result<Vec<ConceptRecord>> {
            Err(crate::error::EngineError::Provider("lookup offline".to_string()))
        }
    }

    const TEXT: &str = "Newton discovered Gravity. Newton was a physicist at Cambridge.";

    #[tokio::test]
    async fn test_no_dangling_edges() {
        let builder = GraphBuilder::default();
        let graph = builder.build(TEXT, "science").await;

        for edge in &graph.edges {
            assert!(graph.contains_node(&edge.source_node_id));
            assert!(graph.contains_node(&edge.target_node_id));
        }
        assert_eq!(graph.metadata.total_nodes, graph.nodes.len());
        assert_eq!(graph.metadata.total_edges, graph.edges.len());
    }

    #[tokio::test]
    async fn test_enrichment_is_additive() {
        let builder = GraphBuilder::default();
        let bare = builder.build(TEXT, "science").await;

        let enriched_builder = GraphBuilder::default().with_enricher(Arc::new(StaticEnricher));
        let enriched = enriched_builder.build(TEXT, "science").await;

        for node in &enriched.nodes {
            let before = bare.node(&node.id).expect("node present in both graphs");
            assert!(node.confidence >= before.confidence);
            assert!(node.sources.contains(&"text_extraction".to_string()));
            assert!(node.sources.contains(&"concept_lookup".to_string()));
        }
    }

    #[tokio::test]
    async fn test_enrichment_failure_leaves_nodes_untouched() {
        let builder = GraphBuilder::default().with_enricher(Arc::new(FailingEnricher));
        let graph = builder.build(TEXT, "science").await;

        assert!(!graph.nodes.is_empty());
        for node in &graph.nodes {
            assert_eq!(node.sources, vec!["text_extraction".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_verify_fact_pattern_match_without_providers() {
        let builder = GraphBuilder::default();
        let verification = builder
            .verify_fact("capital", "capital: New Delhi", "geography")
            .await;

        assert!((verification.confidence - 0.3).abs() < f32::EPSILON);
        assert_eq!(verification.supporting_sources, vec!["domain_knowledge".to_string()]);
        assert_eq!(verification.verification_method, "pattern_matching");
    }

    #[tokio::test]
    async fn test_find_related_concepts_respects_limit() {
        let builder = GraphBuilder::default().with_enricher(Arc::new(StaticEnricher));
        let related = builder.find_related_concepts("Newton", "science", 5).await;
        assert_eq!(related.len(), 1);
        assert!((related[0].confidence - 0.8).abs() < f32::EPSILON);

        let none = GraphBuilder::default()
            .find_related_concepts("Newton", "science", 5)
            .await;
        assert!(none.is_empty());
    }
}
