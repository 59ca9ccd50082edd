//! Data models for the knowledge graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in the knowledge graph. The id is derived deterministically from
/// the label so repeated builds of the same text agree on identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub properties: HashMap<String, serde_json::Value>,
    pub confidence: f32,
    /// Provenance tags, appended only, never removed
    pub sources: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl KnowledgeNode {
    /// Deterministic node id: lowercased label, whitespace as underscores,
    /// everything else stripped.
    pub fn node_id(label: &str) -> String {
        label
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
            .collect()
    }
}

/// A directed edge. Constructed only when both endpoints already exist in
/// the graph; dangling edges are never built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEdge {
    pub source_node_id: String,
    pub target_node_id: String,
    pub relationship: String,
    pub confidence: f32,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub domains: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<KnowledgeNode>,
    pub edges: Vec<KnowledgeEdge>,
    pub metadata: GraphMetadata,
}

impl KnowledgeGraph {
    pub fn node(&self, id: &str) -> Option<&KnowledgeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }
}

/// A candidate record returned by the concept-enrichment collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Pre-verification of a single fact against domain patterns and authority
/// sources. The pass/fail threshold is applied by the orchestrator, not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactVerification {
    pub fact: String,
    pub confidence: f32,
    pub supporting_sources: Vec<String>,
    pub verification_method: String,
}
