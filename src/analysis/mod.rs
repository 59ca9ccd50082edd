//! Text analysis
//!
//! Extracts entities, sentiment and emotion signals, topics, keywords and
//! relationships, and a readability/coherence/bias profile from a block of
//! text. Everything is deterministic lexical pattern matching over the
//! knowledge base; malformed or empty input degrades to empty or neutral
//! results and never errors.

mod entities;
mod quality;
mod semantics;
mod sentiment;

pub use entities::{Entity, EntityLabel};
pub use quality::{ComplexityLevel, TextQuality};
pub use semantics::{Relationship, SemanticAnalysis};
pub use sentiment::{SentimentAnalysis, SentimentLabel};

use crate::knowledge::{KnowledgeBase, KNOWLEDGE_BASE};
use std::sync::Arc;

/// Deterministic lexical text analyzer
#[derive(Clone)]
pub struct TextAnalyzer {
    kb: Arc<KnowledgeBase>,
}

impl TextAnalyzer {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Extract typed entities, deduplicated and sorted by confidence.
    pub fn extract_entities(&self, text: &str) -> Vec<Entity> {
        entities::extract(text)
    }

    /// Sentiment label, confidence and per-emotion scores.
    pub fn analyze_sentiment(&self, text: &str) -> SentimentAnalysis {
        sentiment::analyze(text)
    }

    /// Topics, keywords, concepts and subject-predicate-object relationships.
    pub fn analyze_semantics(&self, text: &str) -> SemanticAnalysis {
        semantics::analyze(&self.kb, text)
    }

    /// Readability, coherence, fact density and bias profile.
    pub fn analyze_text_quality(&self, text: &str) -> TextQuality {
        quality::analyze(text)
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(KNOWLEDGE_BASE.clone())
    }
}
