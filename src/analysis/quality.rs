//! Readability, coherence, fact-density and bias profiling

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Basic,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextQuality {
    /// Flesch-Kincaid style reading ease, clamped to [0, 100]
    pub readability_score: f32,
    pub complexity_level: ComplexityLevel,
    /// Mean adjacent-sentence token overlap in [0, 1]
    pub coherence_score: f32,
    /// Fact-indicator matches per word
    pub fact_density: f32,
    /// Distinct bias categories with at least one pattern hit
    pub bias_indicators: Vec<String>,
}

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("static pattern"));
static VOWEL_GROUPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").expect("static pattern"));

static FACT_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:is|are|was|were|has|have|had|will|would|can|could|should|must)\b",
        r"(?i)\b(?:according to|based on|research shows|studies indicate|data reveals)\b",
        r"(?i)\b(?:percent|%|million|billion|trillion|thousand)\b",
        r"(?i)\b(?:in|on|at|by|for|with|from|to|of)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

static BIAS_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("political", r"(?i)\b(?:liberal|conservative|left-wing|right-wing|progressive|traditional)\b"),
        ("political", r"(?i)\b(?:democrat|republican|socialist|capitalist|communist|fascist)\b"),
        ("gender", r"(?i)\b(?:he|she|him|her|his|hers)\b"),
        ("gender", r"(?i)\b(?:man|woman|male|female|guy|girl|boy|lady|gentleman)\b"),
        ("racial", r"(?i)\b(?:white|black|asian|hispanic|latino|african|european|american)\b"),
        ("racial", r"(?i)\b(?:caucasian|african-american|asian-american|native american)\b"),
        ("religious", r"(?i)\b(?:christian|muslim|jewish|hindu|buddhist|atheist|agnostic)\b"),
        ("religious", r"(?i)\b(?:church|mosque|synagogue|temple|cathedral)\b"),
        ("economic", r"(?i)\b(?:rich|poor|wealthy|poverty|millionaire|billionaire)\b"),
        ("economic", r"(?i)\b(?:elite|privileged|disadvantaged|underprivileged)\b"),
    ]
    .iter()
    .map(|(category, p)| (*category, Regex::new(p).expect("static pattern")))
    .collect()
});

pub(super) fn analyze(text: &str) -> TextQuality {
    let sentences: Vec<&str> = SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let words: Vec<&str> = text.split_whitespace().collect();

    if sentences.is_empty() || words.is_empty() {
        return TextQuality {
            readability_score: 0.0,
            complexity_level: complexity_for(0.0),
            coherence_score: 1.0,
            fact_density: 0.0,
            bias_indicators: Vec::new(),
        };
    }

    let syllables = count_syllables(&words);
    let avg_words_per_sentence = words.len() as f32 / sentences.len() as f32;
    let avg_syllables_per_word = syllables as f32 / words.len() as f32;
    let readability =
        (206.835 - 1.015 * avg_words_per_sentence - 84.6 * avg_syllables_per_word).clamp(0.0, 100.0);

    let fact_matches: usize = FACT_INDICATORS
        .iter()
        .map(|p| p.find_iter(text).count())
        .sum();

    TextQuality {
        readability_score: readability,
        complexity_level: complexity_for(readability),
        coherence_score: coherence(&sentences),
        fact_density: fact_matches as f32 / words.len() as f32,
        bias_indicators: bias_categories(text),
    }
}

fn complexity_for(readability: f32) -> ComplexityLevel {
    if readability >= 80.0 {
        ComplexityLevel::Basic
    } else if readability >= 60.0 {
        ComplexityLevel::Intermediate
    } else {
        ComplexityLevel::Advanced
    }
}

/// Vowel-group syllable estimate, at least one per word
fn count_syllables(words: &[&str]) -> usize {
    words
        .iter()
        .map(|word| {
            let lowered = word.to_lowercase();
            VOWEL_GROUPS.find_iter(&lowered).count().max(1)
        })
        .sum()
}

/// Mean token-overlap ratio over adjacent sentence pairs; a single sentence
/// is fully coherent by definition.
fn coherence(sentences: &[&str]) -> f32 {
    if sentences.len() < 2 {
        return 1.0;
    }

    let mut total = 0.0_f32;
    for pair in sentences.windows(2) {
        let prev_lower = pair[0].to_lowercase();
        let curr_lower = pair[1].to_lowercase();
        let prev: Vec<&str> = prev_lower.split_whitespace().collect();
        let curr: HashSet<&str> = curr_lower.split_whitespace().collect();

        let overlap = prev.iter().filter(|w| curr.contains(*w)).count();
        let denominator = prev.len().max(curr.len());
        if denominator > 0 {
            total += overlap as f32 / denominator as f32;
        }
    }

    total / (sentences.len() - 1) as f32
}

fn bias_categories(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for (category, pattern) in BIAS_PATTERNS.iter() {
        if !seen.iter().any(|c| c == category) && pattern.is_match(text) {
            seen.push(category.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readability_is_clamped() {
        let quality = analyze("Antidisestablishmentarianism extraordinarily incomprehensibilities.");
        assert!((0.0..=100.0).contains(&quality.readability_score));

        let simple = analyze("The cat sat. The dog ran.");
        assert!((0.0..=100.0).contains(&simple.readability_score));
        assert_eq!(simple.complexity_level, ComplexityLevel::Basic);
    }

    #[test]
    fn test_coherence_single_sentence_is_one() {
        let quality = analyze("One lonely sentence here.");
        assert!((quality.coherence_score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_coherence_reflects_overlap() {
        let repeated = analyze("The engine runs fast. The engine runs slow.");
        let disjoint = analyze("Cats sleep all day. Parliament debated the budget.");
        assert!(repeated.coherence_score > disjoint.coherence_score);
    }

    #[test]
    fn test_bias_categories_distinct() {
        let quality = analyze("He said the conservative and progressive camps are both rich and he is wealthy.");
        assert!(quality.bias_indicators.contains(&"gender".to_string()));
        assert!(quality.bias_indicators.contains(&"political".to_string()));
        assert!(quality.bias_indicators.contains(&"economic".to_string()));
        let unique: std::collections::HashSet<_> = quality.bias_indicators.iter().collect();
        assert_eq!(unique.len(), quality.bias_indicators.len());
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let quality = analyze("   ");
        assert_eq!(quality.readability_score, 0.0);
        assert_eq!(quality.fact_density, 0.0);
        assert!(quality.bias_indicators.is_empty());
    }
}
