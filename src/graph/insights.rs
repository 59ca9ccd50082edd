//! Read-only queries over an already-built graph

use super::builder::GraphBuilder;
use super::models::KnowledgeGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Relationship types a reasonably complete graph is expected to carry
const EXPECTED_RELATIONSHIPS: &[&str] = &["is_a", "part_of", "located_in", "founded_by"];

/// Summary insights over one graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInsights {
    /// Top-5 node labels by confidence
    pub key_concepts: Vec<String>,
    /// Top-5 edges by confidence, rendered as "source relationship target"
    pub important_relationships: Vec<String>,
    pub knowledge_gaps: Vec<String>,
    /// Node counts per confidence bucket
    pub confidence_distribution: IndexMap<String, usize>,
}

impl GraphBuilder {
    /// Summarize a built graph: strongest nodes/edges, a confidence
    /// histogram, and a gap report.
    pub fn insights(&self, graph: &KnowledgeGraph) -> GraphInsights {
        let mut nodes: Vec<_> = graph.nodes.iter().collect();
        nodes.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let key_concepts = nodes.iter().take(5).map(|n| n.label.clone()).collect();

        let mut edges: Vec<_> = graph.edges.iter().collect();
        edges.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let important_relationships = edges
            .iter()
            .take(5)
            .map(|e| {
                format!(
                    "{} {} {}",
                    e.source_node_id, e.relationship, e.target_node_id
                )
            })
            .collect();

        GraphInsights {
            key_concepts,
            important_relationships,
            knowledge_gaps: knowledge_gaps(graph),
            confidence_distribution: confidence_distribution(graph),
        }
    }

    /// Token-overlap similarity between two entity strings, boosted when
    /// both sides co-occur in a domain's keyword vocabulary.
    pub fn semantic_similarity(&self, a: &str, b: &str) -> f32 {
        let a_lower = a.to_lowercase();
        let b_lower = b.to_lowercase();
        let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
        let words_b: HashSet<&str> = b_lower.split_whitespace().collect();

        if words_a.is_empty() || words_b.is_empty() {
            return 0.0;
        }

        let intersection = words_a.intersection(&words_b).count();
        let union = words_a.union(&words_b).count();
        let jaccard = intersection as f32 / union as f32;

        let mut boost = 0.0_f32;
        for profile in self.knowledge_base().profiles() {
            let a_hits = words_a.iter().any(|w| profile.keywords.iter().any(|k| k == w));
            let b_hits = words_b.iter().any(|w| profile.keywords.iter().any(|k| k == w));
            if a_hits && b_hits {
                boost += 0.2;
            }
        }

        (jaccard + boost).min(1.0)
    }
}

fn knowledge_gaps(graph: &KnowledgeGraph) -> Vec<String> {
    let mut gaps = Vec::new();

    let low_confidence: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.confidence < 0.5)
        .map(|n| n.label.as_str())
        .collect();
    if !low_confidence.is_empty() {
        gaps.push(format!(
            "Low confidence entities: {}",
            low_confidence.join(", ")
        ));
    }

    let connected: HashSet<&str> = graph
        .edges
        .iter()
        .flat_map(|e| [e.source_node_id.as_str(), e.target_node_id.as_str()])
        .collect();
    let isolated: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| !connected.contains(n.id.as_str()))
        .map(|n| n.label.as_str())
        .collect();
    if !isolated.is_empty() {
        gaps.push(format!("Isolated entities: {}", isolated.join(", ")));
    }

    let present: HashSet<&str> = graph.edges.iter().map(|e| e.relationship.as_str()).collect();
    let missing: Vec<&str> = EXPECTED_RELATIONSHIPS
        .iter()
        .filter(|r| !present.contains(**r))
        .copied()
        .collect();
    if !missing.is_empty() {
        gaps.push(format!("Missing relationship types: {}", missing.join(", ")));
    }

    gaps
}

fn confidence_distribution(graph: &KnowledgeGraph) -> IndexMap<String, usize> {
    let buckets = ["0.0-0.2", "0.2-0.4", "0.4-0.6", "0.6-0.8", "0.8-1.0"];
    let mut distribution: IndexMap<String, usize> =
        buckets.iter().map(|b| (b.to_string(), 0)).collect();

    for node in &graph.nodes {
        let bucket = if node.confidence >= 0.8 {
            "0.8-1.0"
        } else if node.confidence >= 0.6 {
            "0.6-0.8"
        } else if node.confidence >= 0.4 {
            "0.4-0.6"
        } else if node.confidence >= 0.2 {
            "0.2-0.4"
        } else {
            "0.0-0.2"
        };
        if let Some(count) = distribution.get_mut(bucket) {
            *count += 1;
        }
    }

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insights_histogram_counts_all_nodes() {
        let builder = GraphBuilder::default();
        let graph = builder
            .build("Newton discovered Gravity. Newton was a physicist at Cambridge.", "science")
            .await;
        let insights = builder.insights(&graph);

        let counted: usize = insights.confidence_distribution.values().sum();
        assert_eq!(counted, graph.nodes.len());
        assert!(insights.key_concepts.len() <= 5);
    }

    #[tokio::test]
    async fn test_gap_report_flags_isolated_nodes() {
        let builder = GraphBuilder::default();
        let graph = builder.build("Paris is beautiful in Spring.", "geography").await;
        let insights = builder.insights(&graph);

        if graph.edges.is_empty() && !graph.nodes.is_empty() {
            assert!(insights
                .knowledge_gaps
                .iter()
                .any(|g| g.starts_with("Isolated entities")));
        }
    }

    #[test]
    fn test_semantic_similarity_bounds_and_boost() {
        let builder = GraphBuilder::default();

        let same = builder.semantic_similarity("New Delhi", "New Delhi");
        assert!((same - 1.0).abs() < f32::EPSILON);

        let boosted = builder.semantic_similarity("capital city", "capital region");
        let plain = builder.semantic_similarity("blue bird", "blue whale");
        assert!(boosted > plain);
        assert!((0.0..=1.0).contains(&boosted));

        assert_eq!(builder.semantic_similarity("", "x"), 0.0);
    }
}
