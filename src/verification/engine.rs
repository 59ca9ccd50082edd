//! The verification orchestrator

use super::conflicts;
use super::models::{
    ConflictResolution, FactConflict, SessionStatus, VerificationMethod, VerificationResult,
    VerificationSession,
};
use super::resolution;
use super::sessions::SessionStore;
use crate::analysis::TextAnalyzer;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::graph::{ConceptEnrichment, GraphBuilder, KnowledgeGraph};
use crate::knowledge::{KnowledgeBase, KNOWLEDGE_BASE};
use crate::metrics::METRICS;
use crate::scoring::{ConfidenceScore, ConfidenceScoringEngine};
use crate::sources::{ProviderRegistry, SourceAggregator, SourceRecord};
use chrono::Utc;
use futures::future::join_all;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Coordinates source aggregation, conflict handling and scoring into
/// confidence-scored verdicts, one session at a time. Sessions are
/// independent; one engine instance can run many concurrently.
pub struct VerificationEngine {
    aggregator: Arc<SourceAggregator>,
    analyzer: TextAnalyzer,
    scoring: ConfidenceScoringEngine,
    graph: GraphBuilder,
    sessions: SessionStore,
    config: EngineConfig,
}

impl VerificationEngine {
    /// Engine over the built-in knowledge base
    pub fn new(registry: ProviderRegistry, config: EngineConfig) -> Self {
        Self::with_knowledge_base(registry, KNOWLEDGE_BASE.clone(), config)
    }

    /// Engine over an injected knowledge base
    pub fn with_knowledge_base(
        registry: ProviderRegistry,
        kb: Arc<KnowledgeBase>,
        config: EngineConfig,
    ) -> Self {
        let aggregator = Arc::new(SourceAggregator::with_knowledge_base(
            registry,
            kb.clone(),
            &config,
        ));
        let analyzer = TextAnalyzer::new(kb.clone());
        let scoring = ConfidenceScoringEngine::new(kb.clone());
        let graph = GraphBuilder::new(kb).with_aggregator(aggregator.clone());
        let sessions = SessionStore::new(config.session.retention_secs);

        Self {
            aggregator,
            analyzer,
            scoring,
            graph,
            sessions,
            config,
        }
    }

    /// Attach a concept-enrichment collaborator for graph building
    pub fn with_enricher(mut self, enricher: Arc<dyn ConceptEnrichment>) -> Self {
        self.graph = self.graph.with_enricher(enricher);
        self
    }

    /// Run one verification session: all facts are verified concurrently,
    /// individually rejected verifications are logged and excluded, and the
    /// session always comes back with a terminal status and `end_time`.
    pub async fn start_session(
        &self,
        query: &str,
        domain: &str,
        facts: &IndexMap<String, String>,
    ) -> VerificationSession {
        let session_id = format!("verification_{}", Uuid::new_v4().simple());
        let mut session = VerificationSession {
            session_id: session_id.clone(),
            query: query.to_string(),
            domain: domain.to_string(),
            start_time: Utc::now(),
            end_time: None,
            results: Vec::new(),
            overall_confidence: 0.0,
            status: SessionStatus::Running,
        };

        METRICS.sessions_started.inc();
        self.sessions.upsert(session.clone());
        info!("Starting verification session {} for query {:?}", session_id, query);

        match self.run_session(&mut session, facts).await {
            Ok(()) => {
                session.status = SessionStatus::Completed;
            }
            Err(e) => {
                error!("Verification session {} failed: {}", session_id, e);
                session.status = SessionStatus::Failed;
            }
        }
        session.end_time = Some(Utc::now());

        METRICS
            .sessions_finished
            .with_label_values(&[session.status.as_str()])
            .inc();
        self.sessions.upsert(session.clone());

        session
    }

    async fn run_session(
        &self,
        session: &mut VerificationSession,
        facts: &IndexMap<String, String>,
    ) -> Result<()> {
        if facts.len() > self.config.session.max_facts {
            return Err(EngineError::InvalidFact(format!(
                "{} facts exceed the session limit of {}",
                facts.len(),
                self.config.session.max_facts
            )));
        }

        let domain = session.domain.clone();
        let outcomes = join_all(
            facts
                .iter()
                .map(|(fact_type, fact_value)| self.verify_fact(fact_type, fact_value, &domain)),
        )
        .await;

        for outcome in outcomes {
            match outcome {
                Ok(result) => {
                    let label = if result.verified { "verified" } else { "unverified" };
                    METRICS.facts_verified.with_label_values(&[label]).inc();
                    session.results.push(result);
                }
                Err(e) => {
                    warn!("Fact verification rejected: {}", e);
                    METRICS.facts_verified.with_label_values(&["error"]).inc();
                }
            }
        }

        session.overall_confidence = overall_confidence(&session.results);
        Ok(())
    }

    /// Verify one fact against multiple sources: fetch, detect conflicts,
    /// resolve, score.
    pub async fn verify_fact(
        &self,
        fact_type: &str,
        fact_value: &str,
        domain: &str,
    ) -> Result<VerificationResult> {
        if fact_type.trim().is_empty() || fact_value.trim().is_empty() {
            return Err(EngineError::InvalidFact(
                "fact type and value must be non-empty".to_string(),
            ));
        }

        debug!("Verifying fact: {} = {}", fact_type, fact_value);

        let query = format!("{} {}", fact_type, fact_value);
        let sources = self
            .aggregator
            .fetch_many(&query, domain, self.config.aggregator.max_sources)
            .await;

        let conflicts = conflicts::detect_conflicts(fact_value, &sources, fact_type, &self.analyzer);
        let resolution = resolution::resolve(fact_value, &conflicts, &sources, &self.analyzer);

        let confidence = fact_confidence(&sources, &conflicts, &resolution);
        let verified = resolution.resolved && confidence > self.config.session.verified_threshold;

        Ok(VerificationResult {
            fact: format!("{}: {}", fact_type, fact_value),
            verified,
            confidence,
            verification_method: verification_method(sources.len(), conflicts.len()),
            sources,
            conflicts,
            resolution,
            timestamp: Utc::now(),
        })
    }

    /// Build a supporting knowledge graph for a body of text
    pub async fn knowledge_graph(&self, text: &str, domain: &str) -> KnowledgeGraph {
        self.graph.build(text, domain).await
    }

    /// Score a body of content against its sources, extracting entities and
    /// relationships on the way
    pub fn score_content(
        &self,
        content: &str,
        sources: &[SourceRecord],
        domain: &str,
    ) -> ConfidenceScore {
        let entities = self.analyzer.extract_entities(content);
        let semantics = self.analyzer.analyze_semantics(content);
        self.scoring
            .score(content, sources, domain, &entities, &semantics.relationships)
    }

    pub fn session(&self, session_id: &str) -> Option<VerificationSession> {
        self.sessions.get(session_id)
    }

    pub fn active_sessions(&self) -> Vec<VerificationSession> {
        self.sessions.all()
    }

    /// Remove retired sessions past the retention window; an explicit
    /// maintenance operation, not tied to any request path.
    pub fn cleanup_sessions(&self) -> usize {
        self.sessions.cleanup()
    }

    pub fn aggregator(&self) -> &Arc<SourceAggregator> {
        &self.aggregator
    }

    pub fn graph_builder(&self) -> &GraphBuilder {
        &self.graph
    }

    pub fn scoring_engine(&self) -> &ConfidenceScoringEngine {
        &self.scoring
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }
}

fn overall_confidence(results: &[VerificationResult]) -> f32 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.confidence).sum::<f32>() / results.len() as f32
}

/// Base 0.5, raised by source count and mean authority, lowered per
/// conflict by severity, with a bonus for a successful resolution.
fn fact_confidence(
    sources: &[SourceRecord],
    conflicts: &[FactConflict],
    resolution: &ConflictResolution,
) -> f32 {
    let mut confidence = 0.5_f32;

    confidence += (sources.len() as f32 * 0.05).min(0.3);

    if !sources.is_empty() {
        let mean_authority =
            sources.iter().map(|s| s.authority_score).sum::<f32>() / sources.len() as f32;
        confidence += mean_authority * 0.3;
    }

    let penalty: f32 = conflicts.iter().map(|c| c.severity.penalty()).sum();
    confidence -= penalty;

    if resolution.resolved {
        confidence += 0.1;
    }

    confidence.clamp(0.0, 1.0)
}

/// One conflict means the verdict hinged on resolution; otherwise the label
/// reflects how many sources were in play.
fn verification_method(source_count: usize, conflict_count: usize) -> VerificationMethod {
    match conflict_count {
        0 if source_count > 1 => VerificationMethod::MultiSource,
        0 => VerificationMethod::SingleSource,
        1 => VerificationMethod::ConflictResolution,
        _ => VerificationMethod::MultiSource,
    }
}
