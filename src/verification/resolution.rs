//! Conflict resolution strategies
//!
//! Strategies run in a fixed order and the first one that resolves wins:
//! majority vote, authority preference, temporal recency, semantic
//! analysis. When none resolves, the fact is handed to manual review. The
//! order and confidence constants are policy, not derived values.

use super::models::{ConflictResolution, FactConflict, ResolutionMethod};
use crate::analysis::TextAnalyzer;
use crate::metrics::METRICS;
use crate::sources::SourceRecord;
use std::collections::HashMap;

/// Confidence attached to a resolution when no conflicts were detected
const NO_CONFLICT_CONFIDENCE: f32 = 0.9;

/// Confidence attached to an unresolved manual-review fallback
const MANUAL_REVIEW_CONFIDENCE: f32 = 0.3;

const TEMPORAL_RECENCY_CONFIDENCE: f32 = 0.8;
const SEMANTIC_ANALYSIS_CONFIDENCE: f32 = 0.7;

pub(super) fn resolve(
    fact_value: &str,
    conflicts: &[FactConflict],
    sources: &[SourceRecord],
    analyzer: &TextAnalyzer,
) -> ConflictResolution {
    let resolution = resolve_inner(fact_value, conflicts, sources, analyzer);
    METRICS
        .resolutions
        .with_label_values(&[resolution.resolution_method.as_str()])
        .inc();
    resolution
}

fn resolve_inner(
    fact_value: &str,
    conflicts: &[FactConflict],
    sources: &[SourceRecord],
    analyzer: &TextAnalyzer,
) -> ConflictResolution {
    if conflicts.is_empty() {
        return ConflictResolution {
            resolved: true,
            resolution_method: ResolutionMethod::MajorityVote,
            final_value: fact_value.to_string(),
            confidence: NO_CONFLICT_CONFIDENCE,
            explanation: "No conflicts detected".to_string(),
        };
    }

    let attempts = [
        by_majority_vote(fact_value, sources),
        by_authority_preference(fact_value, sources),
        by_temporal_recency(fact_value, sources),
        by_semantic_analysis(fact_value, sources, analyzer),
    ];

    for attempt in attempts {
        if attempt.resolved {
            return attempt;
        }
    }

    ConflictResolution {
        resolved: false,
        resolution_method: ResolutionMethod::ManualReview,
        final_value: fact_value.to_string(),
        confidence: MANUAL_REVIEW_CONFIDENCE,
        explanation: "Conflicts require manual review".to_string(),
    }
}

/// Pick the most frequent extracted value; resolved only when the winner
/// holds a strict majority of sources.
fn by_majority_vote(fact_value: &str, sources: &[SourceRecord]) -> ConflictResolution {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for source in sources {
        if let Some(value) = extract_value(&source.content, fact_value) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let Some((winner, count)) = counts.into_iter().max_by_key(|(_, count)| *count) else {
        return ConflictResolution {
            resolved: false,
            resolution_method: ResolutionMethod::MajorityVote,
            final_value: fact_value.to_string(),
            confidence: MANUAL_REVIEW_CONFIDENCE,
            explanation: "No clear majority found".to_string(),
        };
    };

    let share = count as f32 / sources.len() as f32;

    ConflictResolution {
        resolved: share > 0.5,
        resolution_method: ResolutionMethod::MajorityVote,
        final_value: winner.clone(),
        confidence: share,
        explanation: format!("{} found in {} out of {} sources", winner, count, sources.len()),
    }
}

/// Extract from the single most authoritative source.
fn by_authority_preference(fact_value: &str, sources: &[SourceRecord]) -> ConflictResolution {
    let top = sources.iter().max_by(|a, b| {
        a.authority_score
            .partial_cmp(&b.authority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(top) = top else {
        return ConflictResolution {
            resolved: false,
            resolution_method: ResolutionMethod::AuthorityPreference,
            final_value: fact_value.to_string(),
            confidence: MANUAL_REVIEW_CONFIDENCE,
            explanation: "No authoritative sources available".to_string(),
        };
    };

    let value = extract_value(&top.content, fact_value);

    ConflictResolution {
        resolved: value.is_some(),
        resolution_method: ResolutionMethod::AuthorityPreference,
        final_value: value.unwrap_or_else(|| fact_value.to_string()),
        confidence: top.authority_score,
        explanation: format!("Resolved using most authoritative source: {}", top.name),
    }
}

/// Extract from the most recently updated source.
fn by_temporal_recency(fact_value: &str, sources: &[SourceRecord]) -> ConflictResolution {
    let newest = sources.iter().max_by_key(|s| s.last_updated);

    let Some(newest) = newest else {
        return ConflictResolution {
            resolved: false,
            resolution_method: ResolutionMethod::TemporalRecency,
            final_value: fact_value.to_string(),
            confidence: MANUAL_REVIEW_CONFIDENCE,
            explanation: "No sources available".to_string(),
        };
    };

    let value = extract_value(&newest.content, fact_value);

    ConflictResolution {
        resolved: value.is_some(),
        resolution_method: ResolutionMethod::TemporalRecency,
        final_value: value.unwrap_or_else(|| fact_value.to_string()),
        confidence: TEMPORAL_RECENCY_CONFIDENCE,
        explanation: format!("Resolved using most recent source: {}", newest.name),
    }
}

/// Extract from the source whose semantic analysis is richest
/// (most concepts plus keywords).
fn by_semantic_analysis(
    fact_value: &str,
    sources: &[SourceRecord],
    analyzer: &TextAnalyzer,
) -> ConflictResolution {
    let best = sources.iter().max_by_key(|s| {
        let semantics = analyzer.analyze_semantics(&s.content);
        semantics.concepts.len() + semantics.keywords.len()
    });

    let Some(best) = best else {
        return ConflictResolution {
            resolved: false,
            resolution_method: ResolutionMethod::SemanticAnalysis,
            final_value: fact_value.to_string(),
            confidence: MANUAL_REVIEW_CONFIDENCE,
            explanation: "No sources available".to_string(),
        };
    };

    let value = extract_value(&best.content, fact_value);

    ConflictResolution {
        resolved: value.is_some(),
        resolution_method: ResolutionMethod::SemanticAnalysis,
        final_value: value.unwrap_or_else(|| fact_value.to_string()),
        confidence: SEMANTIC_ANALYSIS_CONFIDENCE,
        explanation: format!("Resolved using semantic analysis of {}", best.name),
    }
}

/// Containment check: the candidate value is the fact value itself when the
/// source mentions it.
fn extract_value(content: &str, fact_value: &str) -> Option<String> {
    if content.to_lowercase().contains(&fact_value.to_lowercase()) {
        Some(fact_value.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::models::{ConflictSeverity, ConflictType};
    use chrono::{Duration, Utc};

    fn source(name: &str, content: &str, authority: f32, age_days: i64) -> SourceRecord {
        SourceRecord {
            name: name.to_string(),
            url: String::new(),
            content: content.to_string(),
            confidence: 0.9,
            last_updated: Utc::now() - Duration::days(age_days),
            authority_score: authority,
            error: None,
            fingerprint: String::new(),
        }
    }

    fn conflict() -> FactConflict {
        FactConflict {
            fact: "value".to_string(),
            conflicting_sources: vec!["A".to_string(), "B".to_string()],
            conflict_type: ConflictType::Numerical,
            severity: ConflictSeverity::Medium,
            description: "test conflict".to_string(),
        }
    }

    fn analyzer() -> TextAnalyzer {
        TextAnalyzer::default()
    }

    #[test]
    fn test_no_conflicts_resolves_immediately() {
        let resolution = resolve("New Delhi", &[], &[], &analyzer());
        assert!(resolution.resolved);
        assert_eq!(resolution.resolution_method, ResolutionMethod::MajorityVote);
        assert!((resolution.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_majority_vote_wins_without_fallthrough() {
        let sources = vec![
            source("A", "the capital is new delhi", 0.5, 1),
            source("B", "new delhi is the seat of government", 0.6, 1),
            source("C", "some pages disagree about everything", 0.99, 1),
        ];

        let resolution = resolve("New Delhi", &[conflict()], &sources, &analyzer());
        assert!(resolution.resolved);
        // 2 of 3 sources carry the value: majority resolves, authority
        // preference (which would pick source C) is never consulted
        assert_eq!(resolution.resolution_method, ResolutionMethod::MajorityVote);
        assert_eq!(resolution.final_value, "New Delhi");
        assert!((resolution.confidence - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_authority_preference_after_majority_fails() {
        let sources = vec![
            source("A", "page one says nothing relevant at all", 0.4, 1),
            source("B", "the capital is new delhi", 0.9, 1),
        ];

        // Value in 1 of 2 sources: share 0.5 is not a strict majority
        let resolution = resolve("New Delhi", &[conflict()], &sources, &analyzer());
        assert!(resolution.resolved);
        assert_eq!(resolution.resolution_method, ResolutionMethod::AuthorityPreference);
        assert!((resolution.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_temporal_recency_reached_only_after_earlier_strategies_fail() {
        // Highest-authority source lacks the value, so authority preference
        // fails; the newest source carries it
        let sources = vec![
            source("Old Authority", "extensive but unrelated coverage", 0.95, 500),
            source("Fresh Outlet", "the capital is new delhi", 0.5, 1),
        ];

        let resolution = resolve("New Delhi", &[conflict()], &sources, &analyzer());
        assert!(resolution.resolved);
        assert_eq!(resolution.resolution_method, ResolutionMethod::TemporalRecency);
        assert_eq!(resolution.final_value, "New Delhi");
        assert!((resolution.confidence - 0.8).abs() < f32::EPSILON);
        assert_eq!(resolution.explanation, "Resolved using most recent source: Fresh Outlet");
    }

    #[test]
    fn test_manual_review_when_nothing_resolves() {
        let sources = vec![
            source("A", "nothing relevant here", 0.9, 1),
            source("B", "nor here either", 0.8, 1),
        ];

        let resolution = resolve("New Delhi", &[conflict()], &sources, &analyzer());
        assert!(!resolution.resolved);
        assert_eq!(resolution.resolution_method, ResolutionMethod::ManualReview);
        assert!((resolution.confidence - 0.3).abs() < f32::EPSILON);
    }
}
