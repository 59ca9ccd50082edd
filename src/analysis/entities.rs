//! Entity extraction via ordered lexical pattern rules

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Entity type set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Date,
    Number,
    Technology,
    Science,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Date => "DATE",
            EntityLabel::Number => "NUMBER",
            EntityLabel::Technology => "TECHNOLOGY",
            EntityLabel::Science => "SCIENCE",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            EntityLabel::Person => "A person mentioned in the text",
            EntityLabel::Organization => "An organization or company",
            EntityLabel::Location => "A geographical location",
            EntityLabel::Date => "A specific date or time",
            EntityLabel::Number => "A numerical value",
            EntityLabel::Technology => "A technology or technical term",
            EntityLabel::Science => "A scientific concept or term",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity extracted from a single text. Offsets are byte indices of the
/// matched span within that text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    pub confidence: f32,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-label pattern rules, evaluated in a fixed order. The capture group,
/// when present, is the entity span; otherwise the whole match is.
static ENTITY_PATTERNS: Lazy<Vec<(EntityLabel, Vec<Regex>)>> = Lazy::new(|| {
    let rules: &[(EntityLabel, &[&str])] = &[
        (
            EntityLabel::Person,
            &[
                r"(?:Mr\.|Ms\.|Dr\.|Prof\.)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
                r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:is|was|are|were|has|have|had)\s+(?:a|an|the)",
                r"(?:born|died|created|founded|discovered)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            ],
        ),
        (
            EntityLabel::Organization,
            &[
                r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:Inc\.|Corp\.|LLC|Ltd\.|Company|Corporation)",
                r"(?:company|organization|institution|university|college)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
                r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:University|College|Institute|Academy)",
            ],
        ),
        (
            EntityLabel::Location,
            &[
                r"(?:in|at|from|to)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
                r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*),\s*[A-Z][a-z]+",
                r"(?:capital|city|country|state|province)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            ],
        ),
        (
            EntityLabel::Date,
            &[
                r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
                r"\b\d{1,2}/\d{1,2}/\d{4}\b",
                r"\b\d{4}-\d{2}-\d{2}\b",
                r"\b(?:in|since|during|on)\s+(\d{4})\b",
            ],
        ),
        (
            EntityLabel::Number,
            &[
                r"\b\d+(?:,\d{3})*(?:\.\d+)?\b",
                r"\b(?:million|billion|trillion)\b",
                r"\b\d+(?:st|nd|rd|th)\b",
            ],
        ),
        (
            EntityLabel::Technology,
            &[
                r"(?i)\b(?:AI|artificial intelligence|machine learning|deep learning|neural network)\b",
                r"(?i)\b(?:API|application programming interface)\b",
                r"(?i)\b(?:HTML|CSS|JavaScript|Python|Java|C\+\+|SQL)\b",
                r"(?i)\b(?:blockchain|cryptocurrency|bitcoin|ethereum)\b",
            ],
        ),
        (
            EntityLabel::Science,
            &[
                r"(?i)\b(?:physics|chemistry|biology|mathematics|astronomy|geology)\b",
                r"(?i)\b(?:theory|hypothesis|experiment|research|study)\b",
                r"(?i)\b(?:molecule|atom|electron|proton|neutron)\b",
                r"(?i)\b(?:DNA|RNA|protein|enzyme|cell)\b",
            ],
        ),
    ];

    rules
        .iter()
        .map(|(label, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("static pattern"))
                .collect();
            (*label, compiled)
        })
        .collect()
});

pub(super) fn extract(text: &str) -> Vec<Entity> {
    let context_words: HashSet<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();

    let mut candidates = Vec::new();

    for (label, patterns) in ENTITY_PATTERNS.iter() {
        for pattern in patterns {
            for caps in pattern.captures_iter(text) {
                let m = match caps.get(1).or_else(|| caps.get(0)) {
                    Some(m) => m,
                    None => continue,
                };

                let entity_text = m.as_str().trim();
                if entity_text.is_empty() {
                    continue;
                }

                let confidence = entity_confidence(entity_text, &context_words);

                candidates.push(Entity {
                    text: entity_text.to_string(),
                    label: *label,
                    confidence,
                    start: m.start(),
                    end: m.end(),
                    reference_url: Some(reference_url(entity_text)),
                    description: Some(label.description().to_string()),
                });
            }
        }
    }

    let mut deduped = dedupe(candidates);
    deduped.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    deduped
}

/// Confidence from span length, capitalization and how much of the entity's
/// own vocabulary recurs in the surrounding text.
fn entity_confidence(entity_text: &str, context_words: &HashSet<String>) -> f32 {
    let mut confidence = 0.5_f32;

    if entity_text.len() > 3 {
        confidence += 0.1;
    }
    if entity_text.len() > 10 {
        confidence += 0.1;
    }

    if entity_text
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
    {
        confidence += 0.1;
    }

    let entity_words: Vec<String> = entity_text
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();

    if !entity_words.is_empty() {
        let matches = entity_words
            .iter()
            .filter(|w| context_words.contains(*w))
            .count();
        confidence += (matches as f32 / entity_words.len() as f32) * 0.2;
    }

    confidence.min(1.0)
}

fn reference_url(entity_text: &str) -> String {
    format!(
        "https://en.wikipedia.org/wiki/{}",
        entity_text.replace(' ', "_")
    )
}

/// Collapse duplicate `(text, label)` pairs keeping the highest confidence.
fn dedupe(candidates: Vec<Entity>) -> Vec<Entity> {
    let mut best: HashMap<(String, EntityLabel), Entity> = HashMap::new();

    for entity in candidates {
        let key = (entity.text.to_lowercase(), entity.label);
        match best.get(&key) {
            Some(existing) if existing.confidence >= entity.confidence => {}
            _ => {
                best.insert(key, entity);
            }
        }
    }

    best.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_person_with_title() {
        let entities = extract("Dr. Isaac Newton published the laws of motion.");
        let person = entities
            .iter()
            .find(|e| e.label == EntityLabel::Person)
            .expect("person entity");
        assert_eq!(person.text, "Isaac Newton");
        assert!(person.confidence > 0.5);
    }

    #[test]
    fn test_offsets_index_source_text() {
        let text = "The company OpenAI Inc. released a model in 2015.";
        for entity in extract(text) {
            assert!(entity.end <= text.len());
            assert!(entity.start < entity.end);
            assert_eq!(&text[entity.start..entity.end], entity.text);
        }
    }

    #[test]
    fn test_duplicates_keep_highest_confidence() {
        let text = "Python is a language. We like Python and python scripts.";
        let entities = extract(text);
        let pythons: Vec<_> = entities
            .iter()
            .filter(|e| e.label == EntityLabel::Technology && e.text.eq_ignore_ascii_case("python"))
            .collect();
        assert_eq!(pythons.len(), 1);
    }

    #[test]
    fn test_sorted_descending_by_confidence() {
        let entities = extract("Dr. Marie Curie discovered Polonium in 1898 in Paris.");
        for pair in entities.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(extract("").is_empty());
    }
}
