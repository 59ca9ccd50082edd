//! Knowledge graph construction
//!
//! Turns entities and relationships extracted from text into a typed
//! node/edge graph, optionally enriched by an external concept-lookup
//! collaborator, and answers read-only queries (fact pre-verification,
//! similarity, insights) over it. One graph is built per verification call
//! and discarded after use.

mod builder;
mod insights;
mod models;

pub use builder::{ConceptEnrichment, GraphBuilder};
pub use insights::GraphInsights;
pub use models::{
    ConceptRecord, FactVerification, GraphMetadata, KnowledgeEdge, KnowledgeGraph, KnowledgeNode,
};
