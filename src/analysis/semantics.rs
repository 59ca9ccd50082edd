//! Topic, concept and relationship extraction

use crate::knowledge::KnowledgeBase;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fixed confidence for template-extracted relationships
const RELATIONSHIP_CONFIDENCE: f32 = 0.7;

/// A directed subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
    pub concepts: Vec<String>,
    pub relationships: Vec<Relationship>,
}

static CONCEPT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // determiner + noun phrase
        r"(?i)\b(?:the|a|an)\s+([a-z]+(?:\s+[a-z]+)*)\b",
        // capitalized multi-word spans
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

static RELATIONSHIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:is|was|are|were)\s+(?:a|an|the)?\s*([a-z]+(?:\s+[a-z]+)*)",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:founded|created|discovered|invented)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:from|in|at)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

const PREDICATES: &[&str] = &[
    "founded", "created", "discovered", "invented", "is", "was", "are", "were", "from", "in", "at",
];

pub(super) fn analyze(kb: &KnowledgeBase, text: &str) -> SemanticAnalysis {
    let lowered = text.to_lowercase();

    let mut topics = Vec::new();
    let mut keywords = Vec::new();

    for profile in kb.profiles() {
        let found: Vec<&String> = profile
            .keywords
            .iter()
            .filter(|k| lowered.contains(&k.to_lowercase()))
            .collect();

        if !found.is_empty() {
            if !topics.contains(&profile.domain) {
                topics.push(profile.domain.clone());
            }
            for keyword in found {
                if !keywords.contains(keyword) {
                    keywords.push(keyword.clone());
                }
            }
        }
    }

    let mut concepts = Vec::new();
    for pattern in CONCEPT_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let concept = match caps.get(1).or_else(|| caps.get(0)) {
                Some(m) => m.as_str().trim().to_string(),
                None => continue,
            };
            if concept.len() > 3 && !concepts.contains(&concept) {
                concepts.push(concept);
            }
        }
    }

    let mut relationships = Vec::new();
    for pattern in RELATIONSHIP_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let (Some(subject), Some(object)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();

            relationships.push(Relationship {
                subject: subject.as_str().trim().to_string(),
                predicate: extract_predicate(matched),
                object: object.as_str().trim().to_string(),
                confidence: RELATIONSHIP_CONFIDENCE,
            });
        }
    }

    SemanticAnalysis {
        topics,
        keywords,
        concepts,
        relationships,
    }
}

fn extract_predicate(matched: &str) -> String {
    let lowered = matched.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    for predicate in PREDICATES {
        if tokens.contains(predicate) {
            return predicate.to_string();
        }
    }

    "related to".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;

    #[test]
    fn test_topics_from_domain_keywords() {
        let kb = KnowledgeBase::builtin();
        let result = analyze(&kb, "The prime minister called an election over the economy.");
        assert!(result.topics.contains(&"politics".to_string()));
        assert!(result.keywords.contains(&"election".to_string()));
    }

    #[test]
    fn test_founded_relationship() {
        let kb = KnowledgeBase::builtin();
        let result = analyze(&kb, "Larry founded Google");
        let rel = result
            .relationships
            .iter()
            .find(|r| r.predicate == "founded")
            .expect("founded relationship");
        assert_eq!(rel.subject, "Larry");
        assert_eq!(rel.object, "Google");
        assert!((rel.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_concepts_are_deduplicated() {
        let kb = KnowledgeBase::builtin();
        let result = analyze(&kb, "The engine drives the engine again.");
        let engines = result.concepts.iter().filter(|c| c.as_str() == "engine").count();
        assert!(engines <= 1);
    }

    #[test]
    fn test_empty_input() {
        let kb = KnowledgeBase::builtin();
        let result = analyze(&kb, "");
        assert!(result.topics.is_empty());
        assert!(result.relationships.is_empty());
    }
}
