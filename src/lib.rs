//! Multi-source fact verification engine
//!
//! `veritas` takes a natural-language claim plus a set of candidate facts,
//! gathers corroborating material from independent content providers,
//! extracts entities and relationships, builds a small knowledge graph,
//! detects disagreements between providers, resolves them with an ordered
//! list of strategies, and emits a confidence-scored verdict per fact.
//!
//! The crate is a library, not a service: providers are injected behind the
//! [`sources::SourceProvider`] trait, all session state is in-memory, and
//! every result is a plain serializable tree.

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod knowledge;
pub mod metrics;
pub mod scoring;
pub mod sources;
pub mod verification;

pub use analysis::{
    Entity, EntityLabel, Relationship, SemanticAnalysis, SentimentAnalysis, TextAnalyzer,
    TextQuality,
};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use graph::{
    ConceptEnrichment, ConceptRecord, GraphBuilder, KnowledgeEdge, KnowledgeGraph, KnowledgeNode,
};
pub use knowledge::{DomainProfile, KnowledgeBase};
pub use scoring::{ConfidenceFactors, ConfidenceScore, ConfidenceScoringEngine, RiskLevel};
pub use sources::{
    HttpProvider, ProviderRegistry, SourceAggregator, SourceContent, SourceProvider, SourceRecord,
};
pub use verification::{
    ConflictResolution, ConflictSeverity, ConflictType, FactConflict, ResolutionMethod,
    SessionStatus, VerificationEngine, VerificationMethod, VerificationResult, VerificationSession,
};
