//! Built-in domain profiles and lexical pattern data
//!
//! This is the data half of the knowledge base: keyword lists, fact
//! patterns, authority sources and reliability weights for the supported
//! domains, plus the noise and quality indicator patterns. Patterns are
//! compiled once at first use of the knowledge base.

use super::{DomainProfile, TrainingExample};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn patterns(items: &[(&str, &str)]) -> IndexMap<String, Regex> {
    items
        .iter()
        .map(|(name, pattern)| (name.to_string(), rx(pattern)))
        .collect()
}

fn weights(items: &[(&str, f32)]) -> HashMap<String, f32> {
    items.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

pub(super) fn builtin_profiles() -> Vec<DomainProfile> {
    vec![
        DomainProfile {
            domain: "politics".to_string(),
            keywords: strings(&[
                "pm", "prime minister", "president", "government", "minister", "parliament",
                "election", "vote", "party", "political",
            ]),
            fact_patterns: patterns(&[
                ("office_holder", r"(?i)(?:current|serving|incumbent)[:\s]+([^.,]+)"),
                ("political_party", r"(?i)(?:party|affiliation|member of)[:\s]+([^.,]+)"),
                ("term_start", r"(?i)(?:assumed office|took office|since)[:\s]+([^.,]+)"),
                ("residence", r"(?i)(?:residence|lives at|address)[:\s]+([^.,]+)"),
                ("predecessor", r"(?i)(?:preceded by|replaced|after)[:\s]+([^.,]+)"),
            ]),
            authority_sources: strings(&[
                "wikipedia.org",
                "pmindia.gov.in",
                "presidentofindia.gov.in",
                "parliament.gov.in",
            ]),
            confidence_factors: weights(&[
                ("official_site", 0.95),
                ("wikipedia", 0.9),
                ("news", 0.7),
                ("blog", 0.5),
            ]),
        },
        DomainProfile {
            domain: "science".to_string(),
            keywords: strings(&[
                "physics", "chemistry", "biology", "mathematics", "scientific", "research",
                "experiment", "theory", "law", "formula",
            ]),
            fact_patterns: patterns(&[
                ("discovery_date", r"(?i)(?:discovered|found|established)[:\s]+([^.,]+)"),
                ("discoverer", r"(?i)(?:discovered by|found by|created by)[:\s]+([^.,]+)"),
                ("formula", r"(?i)(?:formula|equation)[:\s]+([^.,]+)"),
                ("application", r"(?i)(?:used for|applied to|purpose)[:\s]+([^.,]+)"),
                ("unit", r"(?i)(?:measured in|unit)[:\s]+([^.,]+)"),
            ]),
            authority_sources: strings(&[
                "wikipedia.org",
                "britannica.com",
                "scientificamerican.com",
                "nature.com",
                "science.org",
            ]),
            confidence_factors: weights(&[
                ("peer_reviewed", 0.95),
                ("encyclopedia", 0.9),
                ("educational", 0.8),
                ("news", 0.7),
            ]),
        },
        DomainProfile {
            domain: "technology".to_string(),
            keywords: strings(&[
                "ai", "artificial intelligence", "computer", "software", "programming", "tech",
                "startup", "company", "founder", "ceo",
            ]),
            fact_patterns: patterns(&[
                ("founder", r"(?i)(?:founded by|created by|founder)[:\s]+([^.,]+)"),
                ("founded_date", r"(?i)(?:founded|established|created)[:\s]+([^.,]+)"),
                ("headquarters", r"(?i)(?:headquarters|based in|located in)[:\s]+([^.,]+)"),
                ("ceo", r"(?i)(?:ceo|chief executive|leader)[:\s]+([^.,]+)"),
                ("valuation", r"(?i)(?:valued at|worth|valuation)[:\s]+([^.,]+)"),
            ]),
            authority_sources: strings(&[
                "wikipedia.org",
                "techcrunch.com",
                "crunchbase.com",
                "bloomberg.com",
                "reuters.com",
            ]),
            confidence_factors: weights(&[
                ("official_site", 0.95),
                ("financial_news", 0.9),
                ("tech_news", 0.8),
                ("blog", 0.6),
            ]),
        },
        DomainProfile {
            domain: "geography".to_string(),
            keywords: strings(&[
                "country", "city", "capital", "population", "area", "continent", "border",
                "climate", "language", "currency",
            ]),
            fact_patterns: patterns(&[
                ("capital", r"(?i)(?:capital|seat of government)[:\s]+([^.,]+)"),
                ("population", r"(?i)(?:population|inhabitants|people)[:\s]+([^.,]+)"),
                ("area", r"(?i)(?:area|size|square)[:\s]+([^.,]+)"),
                ("currency", r"(?i)(?:currency|money)[:\s]+([^.,]+)"),
                ("language", r"(?i)(?:language|spoken)[:\s]+([^.,]+)"),
            ]),
            authority_sources: strings(&[
                "wikipedia.org",
                "britannica.com",
                "cia.gov",
                "worldbank.org",
                "un.org",
            ]),
            confidence_factors: weights(&[
                ("government_data", 0.95),
                ("international_org", 0.9),
                ("encyclopedia", 0.8),
                ("news", 0.7),
            ]),
        },
        DomainProfile {
            domain: "history".to_string(),
            keywords: strings(&[
                "war", "battle", "ancient", "medieval", "revolution", "independence", "empire",
                "dynasty", "century", "year",
            ]),
            fact_patterns: patterns(&[
                ("date", r"(?i)(?:occurred|happened|took place)[:\s]+([^.,]+)"),
                ("participants", r"(?i)(?:fought by|between|involved)[:\s]+([^.,]+)"),
                ("outcome", r"(?i)(?:result|outcome|ended)[:\s]+([^.,]+)"),
                ("significance", r"(?i)(?:important|significant|impact)[:\s]+([^.,]+)"),
                ("location", r"(?i)(?:took place|occurred|happened)[:\s]+([^.,]+)"),
            ]),
            authority_sources: strings(&[
                "wikipedia.org",
                "britannica.com",
                "history.com",
                "nationalgeographic.com",
                "smithsonianmag.com",
            ]),
            confidence_factors: weights(&[
                ("academic", 0.95),
                ("museum", 0.9),
                ("encyclopedia", 0.8),
                ("educational", 0.7),
            ]),
        },
    ]
}

pub(super) fn builtin_noise_patterns() -> Vec<Regex> {
    [
        // HTML/CSS fragments
        r"(?i)style[^>]*>",
        r"<[^>]*>",
        r"(?i)border:\s*[^;]+;",
        r"(?i)position:\s*[^;]+;",
        r"(?i)display:\s*[^;]+;",
        r"(?i)margin:\s*[^;]+;",
        r"(?i)padding:\s*[^;]+;",
        // Wikipedia metadata
        r"(?i)Retrieved from https?://\S+",
        r"(?i)From Wikipedia, the free encyclopedia",
        r"(?i)This article is about",
        r"(?i)For other uses, see",
        r"(?i)Jump to navigation",
        r"(?i)Jump to search",
        // Search-engine metadata
        r"(?i)DuckDuckGo",
        r"(?i)Search Results",
        r"(?i)More results",
        r"(?i)See also",
        // Common junk
        r"(?i)Q[A-Za-z0-9_]+here",
        r"(?i)Click here",
        r"(?i)Read more",
        r"(?i)Learn more",
        r"(?i)See more",
        r"(?i)View more",
        // Bare date lines
        r"(?m)^\d{1,2}/\d{1,2}/\d{4}$",
        r"(?m)^\d{4}-\d{2}-\d{2}$",
        // Author bylines
        r"(?im)By [A-Za-z ]+$",
        r"(?im)Written by [A-Za-z ]+$",
        r"(?im)Author: [A-Za-z ]+$",
        // Social media references
        r"@[A-Za-z0-9_]+",
        r"#[A-Za-z0-9_]+",
        r"(?i)Follow us",
        r"(?i)Share this",
        // Navigation elements
        r"(?i)Home\s*>\s*",
        r"(?i)Back to",
        r"(?i)Previous",
        r"(?i)Next",
        r"(?i)Menu",
        r"(?i)Navigation",
        // Advertisement
        r"(?i)Advertisement",
        r"(?i)Sponsored",
        r"(?i)Promoted",
        r"(?i)Buy now",
        r"(?i)Shop now",
        // Technical metadata
        r"(?i)Last updated",
        r"(?i)Last modified",
        r"(?i)Version [0-9.]+",
        r"(?i)Build [0-9.]+",
        // Boilerplate site sections
        r"(?i)Cookie policy",
        r"(?i)Privacy policy",
        r"(?i)Terms of service",
        r"(?i)Contact us",
        r"(?i)About us",
        r"(?i)Disclaimer",
    ]
    .iter()
    .map(|p| rx(p))
    .collect()
}

pub(super) fn builtin_quality_indicators() -> Vec<(Regex, f32)> {
    [
        // Positive indicators
        (r"(?m)^[A-Z][^.!?\n]*[.!?]$", 0.3),
        (r"(?i)\b(?:is|are|was|were|has|have|had|will|would|can|could|should|must)\b", 0.2),
        (r"(?i)\b(?:the|a|an|this|that|these|those)\b", 0.1),
        (r"(?i)\b(?:and|or|but|so|because|although|however)\b", 0.1),
        (r"(?i)\b(?:in|on|at|by|for|with|from|to|of)\b", 0.1),
        // Negative indicators
        (r"(?m)^[a-z]", -0.2),
        (r"[.!?]\s*[a-z]", -0.1),
        (r"(?i)\b(?:click|here|more|read|see|view|learn)\b", -0.3),
        (r"(?i)\b(?:this|that|these|those)\s+(?:article|page|site|website)\b", -0.2),
        (r"(?i)(?:\bhttp\b|\bwww\b|\.com\b|\.org\b|\.net\b)", -0.2),
    ]
    .iter()
    .map(|(p, w)| (rx(p), *w))
    .collect()
}

fn facts(items: &[(&str, &str)]) -> IndexMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub(super) fn builtin_examples() -> Vec<TrainingExample> {
    vec![
        TrainingExample {
            query: "pm of india".to_string(),
            category: "politics".to_string(),
            expected_facts: facts(&[
                ("office_holder", "Narendra Modi"),
                ("political_party", "Bharatiya Janata Party (BJP)"),
                ("term_start", "2014"),
                ("residence", "7, Lok Kalyan Marg, New Delhi"),
                ("predecessor", "Manmohan Singh"),
            ]),
            confidence_threshold: 0.9,
            sources: strings(&["wikipedia.org", "pmindia.gov.in"]),
            disambiguation: strings(&["Politics", "People", "History"]),
        },
        TrainingExample {
            query: "python programming".to_string(),
            category: "technology".to_string(),
            expected_facts: facts(&[
                ("founder", "Guido van Rossum"),
                ("founded_date", "1991"),
                ("headquarters", "Python Software Foundation"),
                ("ceo", "Guido van Rossum (Benevolent Dictator for Life)"),
                ("valuation", "Open source"),
            ]),
            confidence_threshold: 0.85,
            sources: strings(&["wikipedia.org", "python.org"]),
            disambiguation: strings(&["Computing", "Biology", "Mythology"]),
        },
        TrainingExample {
            query: "newton laws of motion".to_string(),
            category: "science".to_string(),
            expected_facts: facts(&[
                ("discovery_date", "1687"),
                ("discoverer", "Isaac Newton"),
                ("formula", "F = ma"),
                ("application", "Mechanics, Engineering, Physics"),
                ("unit", "Newtons (N)"),
            ]),
            confidence_threshold: 0.95,
            sources: strings(&["wikipedia.org", "britannica.com"]),
            disambiguation: strings(&["Physics", "People", "History"]),
        },
        TrainingExample {
            query: "openai founder".to_string(),
            category: "technology".to_string(),
            expected_facts: facts(&[
                ("founder", "Sam Altman, Elon Musk, Greg Brockman"),
                ("founded_date", "2015"),
                ("headquarters", "San Francisco, California"),
                ("ceo", "Sam Altman"),
                ("valuation", "$80+ billion"),
            ]),
            confidence_threshold: 0.9,
            sources: strings(&["wikipedia.org", "openai.com", "techcrunch.com"]),
            disambiguation: strings(&["Technology", "People", "Business"]),
        },
        TrainingExample {
            query: "capital of india".to_string(),
            category: "geography".to_string(),
            expected_facts: facts(&[
                ("capital", "New Delhi"),
                ("population", "32 million (metro area)"),
                ("area", "1,484 km²"),
                ("currency", "Indian Rupee (INR)"),
                ("language", "Hindi, English"),
            ]),
            confidence_threshold: 0.95,
            sources: strings(&["wikipedia.org", "gov.in"]),
            disambiguation: strings(&["Geography", "Politics", "Culture"]),
        },
    ]
}
