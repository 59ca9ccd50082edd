use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use veritas::{ConfidenceScoringEngine, SourceRecord, TextAnalyzer};

const CONTENT: &str = "New Delhi is the capital of India. The capital city hosts the national \
                       parliament, the union government and several historic institutions. \
                       According to official records the metropolitan region spans a large area \
                       and remains the political center of the country.";

fn sources() -> Vec<SourceRecord> {
    ["Wikipedia", "Britannica", "World Bank"]
        .iter()
        .enumerate()
        .map(|(i, name)| SourceRecord {
            name: name.to_string(),
            url: format!("https://{}.example/article", name.to_lowercase()),
            content: CONTENT.to_string(),
            confidence: 0.9,
            last_updated: Utc::now() - Duration::days(i as i64 * 40),
            authority_score: 0.9,
            error: None,
            fingerprint: String::new(),
        })
        .collect()
}

fn bench_confidence_score(c: &mut Criterion) {
    let engine = ConfidenceScoringEngine::default();
    let analyzer = TextAnalyzer::default();
    let sources = sources();
    let entities = analyzer.extract_entities(CONTENT);
    let relationships = analyzer.analyze_semantics(CONTENT).relationships;

    c.bench_function("confidence_score", |b| {
        b.iter(|| {
            engine.score(
                black_box(CONTENT),
                black_box(&sources),
                "geography",
                &entities,
                &relationships,
            )
        })
    });
}

fn bench_entity_extraction(c: &mut Criterion) {
    let analyzer = TextAnalyzer::default();

    c.bench_function("extract_entities", |b| {
        b.iter(|| analyzer.extract_entities(black_box(CONTENT)))
    });
}

criterion_group!(benches, bench_confidence_score, bench_entity_extraction);
criterion_main!(benches);
