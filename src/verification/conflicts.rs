//! Conflict detection between sources
//!
//! Pairwise categorical and numerical checks plus set-level temporal and
//! semantic checks. Every conflict names at least two sources.

use super::models::{ConflictSeverity, ConflictType, FactConflict};
use crate::analysis::TextAnalyzer;
use crate::metrics::METRICS;
use crate::sources::SourceRecord;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens that negate an adjacent assertion
const NEGATIONS: &[&str] = &["not", "no", "never", "none", "neither", "nor"];

/// Sources older than this, while newer ones exist, are flagged as stale
const STALE_DAYS: i64 = 365;

/// Two numbers differing by more than this share of the larger conflict
const NUMERIC_DIVERGENCE: f32 = 0.5;

/// Sentiment labels must differ by more than this confidence gap to count
const SENTIMENT_GAP: f32 = 0.3;

/// Window of characters around a fact mention searched for negation tokens
const NEGATION_WINDOW: usize = 48;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").expect("static pattern"));

pub(super) fn detect_conflicts(
    fact_value: &str,
    sources: &[SourceRecord],
    fact_type: &str,
    analyzer: &TextAnalyzer,
) -> Vec<FactConflict> {
    let mut conflicts = Vec::new();

    for i in 0..sources.len() {
        for j in (i + 1)..sources.len() {
            if let Some(conflict) = compare_pair(&sources[i], &sources[j], fact_value) {
                conflicts.push(conflict);
            }
        }
    }

    conflicts.extend(temporal_conflicts(sources, fact_type));
    conflicts.extend(semantic_conflicts(sources, fact_value, analyzer));

    for conflict in &conflicts {
        METRICS
            .conflicts_detected
            .with_label_values(&[conflict.conflict_type.as_str()])
            .inc();
    }

    conflicts
}

/// Categorical contradiction first, then numerical divergence.
fn compare_pair(a: &SourceRecord, b: &SourceRecord, fact_value: &str) -> Option<FactConflict> {
    let content_a = a.content.to_lowercase();
    let content_b = b.content.to_lowercase();
    let value = fact_value.to_lowercase();

    if contradicts(&content_a, &content_b, &value) || contradicts(&content_b, &content_a, &value) {
        return Some(FactConflict {
            fact: fact_value.to_string(),
            conflicting_sources: vec![a.name.clone(), b.name.clone()],
            conflict_type: ConflictType::Categorical,
            severity: ConflictSeverity::High,
            description: format!("Direct contradiction between {} and {}", a.name, b.name),
        });
    }

    if numerical_divergence(&content_a, &content_b) {
        return Some(FactConflict {
            fact: fact_value.to_string(),
            conflicting_sources: vec![a.name.clone(), b.name.clone()],
            conflict_type: ConflictType::Numerical,
            severity: ConflictSeverity::Medium,
            description: format!("Numerical discrepancy between {} and {}", a.name, b.name),
        });
    }

    None
}

/// One side negates the fact near its mention while the other affirms it.
fn contradicts(negating: &str, affirming: &str, value: &str) -> bool {
    if !affirming.contains(value) {
        return false;
    }

    let mut search_from = 0;
    while let Some(pos) = negating[search_from..].find(value) {
        let start = search_from + pos;
        let window_start = start.saturating_sub(NEGATION_WINDOW);
        let window_end = (start + value.len() + NEGATION_WINDOW).min(negating.len());
        // Clamp to char boundaries so the window slice cannot panic
        let window_start = floor_char_boundary(negating, window_start);
        let window_end = floor_char_boundary(negating, window_end);
        let window = &negating[window_start..window_end];

        if window
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| NEGATIONS.contains(&token))
        {
            return true;
        }

        search_from = start + value.len();
    }

    false
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Any two numbers across the pair differing by more than half the larger.
fn numerical_divergence(content_a: &str, content_b: &str) -> bool {
    let numbers_a = parse_numbers(content_a);
    let numbers_b = parse_numbers(content_b);

    for a in &numbers_a {
        for b in &numbers_b {
            if *a > 0.0 && *b > 0.0 && (a - b).abs() / a.max(*b) > NUMERIC_DIVERGENCE {
                return true;
            }
        }
    }

    false
}

fn parse_numbers(content: &str) -> Vec<f32> {
    NUMBER
        .find_iter(content)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f32>().ok())
        .collect()
}

/// Stale sources while newer ones exist.
fn temporal_conflicts(sources: &[SourceRecord], fact_type: &str) -> Vec<FactConflict> {
    let now = Utc::now();
    let outdated: Vec<&SourceRecord> = sources
        .iter()
        .filter(|s| (now - s.last_updated).num_days() > STALE_DAYS)
        .collect();

    if outdated.is_empty() || outdated.len() >= sources.len() {
        return Vec::new();
    }

    vec![FactConflict {
        fact: fact_type.to_string(),
        conflicting_sources: outdated.iter().map(|s| s.name.clone()).collect(),
        conflict_type: ConflictType::Temporal,
        severity: ConflictSeverity::Medium,
        description: "Outdated information detected in some sources".to_string(),
    }]
}

/// Pairwise sentiment disagreement with a wide confidence gap.
fn semantic_conflicts(
    sources: &[SourceRecord],
    fact_value: &str,
    analyzer: &TextAnalyzer,
) -> Vec<FactConflict> {
    let sentiments: Vec<_> = sources
        .iter()
        .map(|s| analyzer.analyze_sentiment(&s.content))
        .collect();

    let mut conflicts = Vec::new();
    for i in 0..sources.len() {
        for j in (i + 1)..sources.len() {
            if sentiments[i].sentiment != sentiments[j].sentiment
                && (sentiments[i].confidence - sentiments[j].confidence).abs() > SENTIMENT_GAP
            {
                conflicts.push(FactConflict {
                    fact: fact_value.to_string(),
                    conflicting_sources: vec![sources[i].name.clone(), sources[j].name.clone()],
                    conflict_type: ConflictType::Semantic,
                    severity: ConflictSeverity::Low,
                    description: "Different sentiment analysis results".to_string(),
                });
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn source(name: &str, content: &str, age_days: i64) -> SourceRecord {
        SourceRecord {
            name: name.to_string(),
            url: String::new(),
            content: content.to_string(),
            confidence: 0.9,
            last_updated: Utc::now() - Duration::days(age_days),
            authority_score: 0.8,
            error: None,
            fingerprint: String::new(),
        }
    }

    fn analyzer() -> TextAnalyzer {
        TextAnalyzer::default()
    }

    #[test]
    fn test_categorical_contradiction_requires_adjacent_negation() {
        let affirming = source("A", "The capital of India is New Delhi as records show.", 1);
        let negating = source("B", "The capital is not New Delhi according to this page.", 1);
        let distant = source(
            "C",
            "New Delhi hosts the parliament. Unrelated trailing text follows here with many words \
             between that mention and this sentence, which says no such thing about anything.",
            1,
        );

        let conflicts = detect_conflicts(
            "New Delhi",
            &[affirming.clone(), negating],
            "capital",
            &analyzer(),
        );
        assert!(conflicts
            .iter()
            .any(|c| c.conflict_type == ConflictType::Categorical
                && c.severity == ConflictSeverity::High));

        let no_conflicts =
            detect_conflicts("New Delhi", &[affirming, distant], "capital", &analyzer());
        assert!(no_conflicts
            .iter()
            .all(|c| c.conflict_type != ConflictType::Categorical));
    }

    #[test]
    fn test_numerical_conflict_at_eighty_percent_divergence() {
        let a = source("A", "The population is 1,000,000 residents", 1);
        let b = source("B", "The population is 5,000,000 residents", 1);

        let conflicts = detect_conflicts("population", &[a, b], "population", &analyzer());
        let numerical: Vec<_> = conflicts
            .iter()
            .filter(|c| c.conflict_type == ConflictType::Numerical)
            .collect();
        assert_eq!(numerical.len(), 1);
        assert_eq!(numerical[0].severity, ConflictSeverity::Medium);
        assert_eq!(numerical[0].conflicting_sources.len(), 2);
    }

    #[test]
    fn test_close_numbers_do_not_conflict() {
        let a = source("A", "measured 100 units", 1);
        let b = source("B", "measured 120 units", 1);

        let conflicts = detect_conflicts("units", &[a, b], "measurement", &analyzer());
        assert!(conflicts
            .iter()
            .all(|c| c.conflict_type != ConflictType::Numerical));
    }

    #[test]
    fn test_temporal_conflict_flags_stale_source() {
        let old = source("Old Press", "archived coverage of the topic", 400);
        let new = source("Fresh Press", "current coverage of the topic", 2);

        let conflicts = detect_conflicts("value", &[old, new], "topic", &analyzer());
        let temporal: Vec<_> = conflicts
            .iter()
            .filter(|c| c.conflict_type == ConflictType::Temporal)
            .collect();
        assert_eq!(temporal.len(), 1);
        assert_eq!(temporal[0].conflicting_sources, vec!["Old Press".to_string()]);
    }

    #[test]
    fn test_all_stale_sources_are_not_a_temporal_conflict() {
        let a = source("A", "old text", 400);
        let b = source("B", "old text too", 500);

        let conflicts = detect_conflicts("value", &[a, b], "topic", &analyzer());
        assert!(conflicts
            .iter()
            .all(|c| c.conflict_type != ConflictType::Temporal));
    }

    #[test]
    fn test_semantic_conflict_needs_label_and_gap() {
        let glowing = source("A", "excellent amazing wonderful fantastic", 1);
        let mixed = source("B", "average standard normal excellent good best", 1);

        let conflicts = detect_conflicts("value", &[glowing, mixed], "topic", &analyzer());
        let semantic: Vec<_> = conflicts
            .iter()
            .filter(|c| c.conflict_type == ConflictType::Semantic)
            .collect();
        assert_eq!(semantic.len(), 1);
        assert_eq!(semantic[0].severity, ConflictSeverity::Low);
    }
}
