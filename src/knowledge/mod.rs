//! Domain knowledge base
//!
//! Static, per-domain configuration: keyword lists, fact-extraction
//! patterns, authority-source lists, source-reliability weights, plus the
//! noise rules and lexical quality indicators used to clean and grade raw
//! text. Pure data and pure functions; nothing here mutates after startup.

mod domains;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-wide immutable knowledge base with the built-in domain profiles.
/// Components take an `Arc<KnowledgeBase>` by injection; this static is the
/// convenience default.
pub static KNOWLEDGE_BASE: Lazy<Arc<KnowledgeBase>> =
    Lazy::new(|| Arc::new(KnowledgeBase::builtin()));

/// Immutable per-domain configuration
#[derive(Debug)]
pub struct DomainProfile {
    pub domain: String,
    /// Ordered keyword list used for topic detection
    pub keywords: Vec<String>,
    /// Ordered fact-name -> extraction pattern (first match per name wins)
    pub fact_patterns: IndexMap<String, Regex>,
    /// Source identifiers considered authoritative for this domain
    pub authority_sources: Vec<String>,
    /// Source-or-category -> reliability weight in [0, 1]
    pub confidence_factors: HashMap<String, f32>,
}

/// A curated calibration example: a query with the facts a correct
/// verification run is expected to surface.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub query: String,
    pub category: String,
    pub expected_facts: IndexMap<String, String>,
    pub confidence_threshold: f32,
    pub sources: Vec<String>,
    pub disambiguation: Vec<String>,
}

/// Static knowledge base: domain profiles plus text-cleaning and
/// quality-grading pattern data.
#[derive(Debug)]
pub struct KnowledgeBase {
    profiles: Vec<DomainProfile>,
    noise_patterns: Vec<Regex>,
    quality_indicators: Vec<(Regex, f32)>,
    examples: Vec<TrainingExample>,
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

impl KnowledgeBase {
    /// Knowledge base with the built-in domain profiles
    pub fn builtin() -> Self {
        Self {
            profiles: domains::builtin_profiles(),
            noise_patterns: domains::builtin_noise_patterns(),
            quality_indicators: domains::builtin_quality_indicators(),
            examples: domains::builtin_examples(),
        }
    }

    /// Look up a domain profile by key
    pub fn profile(&self, domain: &str) -> Option<&DomainProfile> {
        self.profiles.iter().find(|p| p.domain == domain)
    }

    /// All configured domain keys
    pub fn domains(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.domain.as_str()).collect()
    }

    /// All configured profiles
    pub fn profiles(&self) -> &[DomainProfile] {
        &self.profiles
    }

    /// Apply each of the domain's fact patterns to the text, keeping the
    /// first match per fact name. Unknown domains yield an empty map.
    pub fn extract_facts(&self, text: &str, domain: &str) -> IndexMap<String, String> {
        let mut facts = IndexMap::new();

        let Some(profile) = self.profile(domain) else {
            return facts;
        };

        for (fact_name, pattern) in &profile.fact_patterns {
            if let Some(caps) = pattern.captures(text) {
                if let Some(m) = caps.get(1) {
                    facts.insert(fact_name.clone(), m.as_str().trim().to_string());
                }
            }
        }

        facts
    }

    /// Strip markup and boilerplate noise, then collapse whitespace.
    pub fn clean_text(&self, text: &str) -> String {
        let mut cleaned = text.to_string();

        for pattern in &self.noise_patterns {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }

        WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
    }

    /// Lexical quality score: sum of signed indicator weights over their
    /// match counts, clamped to [0, 1].
    pub fn quality_score(&self, text: &str) -> f32 {
        let mut score = 0.0_f32;

        for (pattern, weight) in &self.quality_indicators {
            let matches = pattern.find_iter(text).count();
            score += weight * matches as f32;
        }

        score.clamp(0.0, 1.0)
    }

    /// Domain-aware confidence factors, empty for unknown domains
    pub fn confidence_factors(&self, domain: &str) -> HashMap<String, f32> {
        self.profile(domain)
            .map(|p| p.confidence_factors.clone())
            .unwrap_or_default()
    }

    /// Authority source identifiers for a domain, empty for unknown domains
    pub fn authority_sources(&self, domain: &str) -> Vec<String> {
        self.profile(domain)
            .map(|p| p.authority_sources.clone())
            .unwrap_or_default()
    }

    /// The curated calibration examples
    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    /// Calibration examples for one category
    pub fn examples_for(&self, category: &str) -> Vec<&TrainingExample> {
        self.examples.iter().filter(|e| e.category == category).collect()
    }
}
