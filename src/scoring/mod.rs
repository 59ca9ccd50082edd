//! Confidence scoring
//!
//! Blends ten independent [0, 1] factor estimates into one weighted overall
//! confidence with a textual explanation, ordered recommendations and a
//! risk tier. All factors are deterministic heuristics over extracted
//! features; nothing here is learned.

use crate::analysis::{Entity, Relationship, TextAnalyzer};
use crate::knowledge::{KnowledgeBase, KNOWLEDGE_BASE};
use crate::sources::SourceRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Risk tier thresholds over the overall score
const HIGH_CONFIDENCE: f32 = 0.8;
const MEDIUM_CONFIDENCE: f32 = 0.6;

/// Overall blend weights. Entity recognition and relationship confidence
/// are computed and reported but deliberately carry no weight, matching
/// the reference scoring behavior (see DESIGN.md).
const OVERALL_WEIGHTS: [f32; 8] = [0.20, 0.15, 0.20, 0.10, 0.15, 0.10, 0.05, 0.05];

/// The ten independent factor estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub source_reliability: f32,
    pub content_quality: f32,
    pub cross_source_agreement: f32,
    pub temporal_freshness: f32,
    pub semantic_consistency: f32,
    pub domain_expertise: f32,
    pub fact_density: f32,
    pub bias_indicators: f32,
    pub entity_recognition: f32,
    pub relationship_confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub overall: f32,
    pub factors: ConfidenceFactors,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

/// Deterministic multi-factor confidence scorer
pub struct ConfidenceScoringEngine {
    kb: Arc<KnowledgeBase>,
    analyzer: TextAnalyzer,
}

impl ConfidenceScoringEngine {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        let analyzer = TextAnalyzer::new(kb.clone());
        Self { kb, analyzer }
    }

    /// Score a body of content against its sources and extracted structure.
    pub fn score(
        &self,
        content: &str,
        sources: &[SourceRecord],
        domain: &str,
        entities: &[Entity],
        relationships: &[Relationship],
    ) -> ConfidenceScore {
        let factors = ConfidenceFactors {
            source_reliability: self.source_reliability(sources, domain),
            content_quality: self.content_quality(content),
            cross_source_agreement: cross_source_agreement(sources),
            temporal_freshness: temporal_freshness(sources),
            semantic_consistency: self.semantic_consistency(content, domain),
            domain_expertise: self.domain_expertise(domain, sources),
            fact_density: self.fact_density(content),
            bias_indicators: self.bias_indicators(content),
            entity_recognition: entity_recognition(entities),
            relationship_confidence: relationship_confidence(relationships),
        };

        let overall = overall(&factors);

        ConfidenceScore {
            overall,
            explanation: explanation(&factors),
            recommendations: recommendations(&factors),
            risk_level: risk_level(overall),
            factors,
        }
    }

    /// Per-source base trust plus authority-list membership, well-known
    /// origin URLs and content volume, averaged.
    fn source_reliability(&self, sources: &[SourceRecord], domain: &str) -> f32 {
        if sources.is_empty() {
            return 0.0;
        }

        let authority_sources = self.kb.authority_sources(domain);
        let mut total = 0.0_f32;

        for source in sources {
            let mut score = 0.5_f32;

            if authority_sources.iter().any(|a| source.url.contains(a)) {
                score += 0.3;
            }

            if source.url.contains("wikipedia.org") {
                score += 0.2;
            } else if source.url.contains("gov.in") || source.url.contains("gov.uk") {
                score += 0.25;
            } else if source.url.contains("britannica.com") {
                score += 0.2;
            } else if source.url.contains("nature.com") || source.url.contains("science.org") {
                score += 0.25;
            }

            if source.content.len() > 200 {
                score += 0.1;
            }
            if source.content.len() > 500 {
                score += 0.1;
            }

            total += score;
        }

        (total / sources.len() as f32).min(1.0)
    }

    fn content_quality(&self, content: &str) -> f32 {
        if content.len() < 50 {
            return 0.0;
        }

        let quality = self.analyzer.analyze_text_quality(content);
        let lexical = self.kb.quality_score(content);

        let mut score = 0.0_f32;
        score += (quality.readability_score / 100.0) * 0.3;
        score += quality.coherence_score * 0.3;
        score += (quality.fact_density * 10.0).min(1.0) * 0.2;
        score += lexical * 0.2;

        score.min(1.0)
    }

    fn semantic_consistency(&self, content: &str, domain: &str) -> f32 {
        let Some(profile) = self.kb.profile(domain) else {
            return 0.5;
        };

        let semantics = self.analyzer.analyze_semantics(content);

        let keyword_matches = profile
            .keywords
            .iter()
            .filter(|keyword| {
                let keyword = keyword.to_lowercase();
                semantics
                    .keywords
                    .iter()
                    .any(|found| found.to_lowercase().contains(&keyword))
            })
            .count();

        let mut score = 0.0_f32;
        if !profile.keywords.is_empty() {
            score += (keyword_matches as f32 / profile.keywords.len() as f32) * 0.5;
        }
        score += (semantics.concepts.len() as f32 / 10.0).min(1.0) * 0.3;
        score += (semantics.relationships.len() as f32 / 5.0).min(1.0) * 0.2;

        score.min(1.0)
    }

    fn domain_expertise(&self, domain: &str, sources: &[SourceRecord]) -> f32 {
        let Some(profile) = self.kb.profile(domain) else {
            return 0.5;
        };
        if sources.is_empty() {
            return 0.5;
        }

        let domain_sources = sources
            .iter()
            .filter(|s| profile.authority_sources.iter().any(|a| s.url.contains(a)))
            .count();

        let hosts: HashSet<String> = sources
            .iter()
            .filter_map(|s| host_of(&s.url))
            .collect();

        let mut score = (domain_sources as f32 / sources.len() as f32) * 0.6;
        score += (hosts.len() as f32 / 3.0).min(1.0) * 0.4;
        score.min(1.0)
    }

    fn fact_density(&self, content: &str) -> f32 {
        let quality = self.analyzer.analyze_text_quality(content);
        (quality.fact_density * 5.0).min(1.0)
    }

    /// More distinct bias categories, lower score
    fn bias_indicators(&self, content: &str) -> f32 {
        let quality = self.analyzer.analyze_text_quality(content);
        (1.0 - quality.bias_indicators.len() as f32 * 0.2).max(0.0)
    }
}

impl Default for ConfidenceScoringEngine {
    fn default() -> Self {
        Self::new(KNOWLEDGE_BASE.clone())
    }
}

/// Mean pairwise token-Jaccard over source contents; neutral 0.5 below two
/// sources.
fn cross_source_agreement(sources: &[SourceRecord]) -> f32 {
    if sources.len() < 2 {
        return 0.5;
    }

    let token_sets: Vec<HashSet<String>> = sources
        .iter()
        .map(|s| {
            s.content
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect()
        })
        .collect();

    let mut total = 0.0_f32;
    let mut comparisons = 0usize;

    for i in 0..token_sets.len() {
        for j in (i + 1)..token_sets.len() {
            let intersection = token_sets[i].intersection(&token_sets[j]).count();
            let union = token_sets[i].union(&token_sets[j]).count();
            if union > 0 {
                total += intersection as f32 / union as f32;
            }
            comparisons += 1;
        }
    }

    if comparisons == 0 {
        return 0.5;
    }
    total / comparisons as f32
}

/// Stepwise decay at the 30/90/365-day age thresholds, averaged.
fn temporal_freshness(sources: &[SourceRecord]) -> f32 {
    if sources.is_empty() {
        return 0.0;
    }

    let now = Utc::now();
    let mut total = 0.0_f32;

    for source in sources {
        let days = (now - source.last_updated).num_days();

        let mut freshness = 1.0_f32;
        if days > 30 {
            freshness -= 0.2;
        }
        if days > 90 {
            freshness -= 0.3;
        }
        if days > 365 {
            freshness -= 0.4;
        }

        total += freshness.max(0.0);
    }

    total / sources.len() as f32
}

fn entity_recognition(entities: &[Entity]) -> f32 {
    if entities.is_empty() {
        return 0.5;
    }

    let mean: f32 = entities.iter().map(|e| e.confidence).sum::<f32>() / entities.len() as f32;
    let high = entities.iter().filter(|e| e.confidence > 0.7).count();

    (mean + high as f32 / entities.len() as f32) / 2.0
}

fn relationship_confidence(relationships: &[Relationship]) -> f32 {
    if relationships.is_empty() {
        return 0.5;
    }

    let mean: f32 =
        relationships.iter().map(|r| r.confidence).sum::<f32>() / relationships.len() as f32;
    let strong = relationships.iter().filter(|r| r.confidence > 0.8).count();

    (mean + strong as f32 / relationships.len() as f32) / 2.0
}

fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}

fn overall(factors: &ConfidenceFactors) -> f32 {
    let weighted = [
        factors.source_reliability,
        factors.content_quality,
        factors.cross_source_agreement,
        factors.temporal_freshness,
        factors.semantic_consistency,
        factors.domain_expertise,
        factors.fact_density,
        factors.bias_indicators,
    ];

    let total_weight: f32 = OVERALL_WEIGHTS.iter().sum();
    let weighted_sum: f32 = weighted
        .iter()
        .zip(OVERALL_WEIGHTS.iter())
        .map(|(value, weight)| value * weight)
        .sum();

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.5
    }
}

/// Pure mapping from the overall score to a risk tier
fn risk_level(overall: f32) -> RiskLevel {
    if overall >= HIGH_CONFIDENCE {
        RiskLevel::Low
    } else if overall >= MEDIUM_CONFIDENCE {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn explanation(factors: &ConfidenceFactors) -> String {
    let mut parts = Vec::new();

    if factors.source_reliability > 0.8 {
        parts.push("High-quality sources from authoritative domains");
    } else if factors.source_reliability < 0.4 {
        parts.push("Limited or unreliable source information");
    }

    if factors.cross_source_agreement > 0.8 {
        parts.push("Strong agreement across multiple sources");
    } else if factors.cross_source_agreement < 0.4 {
        parts.push("Conflicting information across sources");
    }

    if factors.content_quality > 0.8 {
        parts.push("Well-structured and coherent content");
    } else if factors.content_quality < 0.4 {
        parts.push("Poor content quality and structure");
    }

    if factors.temporal_freshness > 0.8 {
        parts.push("Recent and up-to-date information");
    } else if factors.temporal_freshness < 0.4 {
        parts.push("Outdated or stale information");
    }

    if factors.bias_indicators < 0.6 {
        parts.push("Potential bias detected in content");
    }

    if parts.is_empty() {
        parts.push("Standard confidence level based on available information");
    }

    format!("{}.", parts.join(". "))
}

fn recommendations(factors: &ConfidenceFactors) -> Vec<String> {
    let mut recommendations = Vec::new();

    if factors.source_reliability < 0.6 {
        recommendations.push("Seek additional authoritative sources".to_string());
    }
    if factors.cross_source_agreement < 0.6 {
        recommendations.push("Verify information across more sources".to_string());
    }
    if factors.temporal_freshness < 0.6 {
        recommendations.push("Look for more recent information".to_string());
    }
    if factors.content_quality < 0.6 {
        recommendations.push("Improve content structure and clarity".to_string());
    }
    if factors.bias_indicators < 0.6 {
        recommendations.push("Review content for potential bias".to_string());
    }
    if factors.domain_expertise < 0.6 {
        recommendations.push("Consult domain-specific experts".to_string());
    }

    recommendations
}
