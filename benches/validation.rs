//! Validation throughput benchmarks.
//!
//! Measures entity construction, field resolution and full message
//! collection against a representative record type, for both conforming
//! and violating payloads.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use metamodel::{Kind, Matcher, ModelSchema};
use serde_json::{Value, json};

static EXPERIMENT: ModelSchema = ModelSchema::new("Experiment", |m| {
    m.field("name", Kind::String)?;
    m.field(
        "subject",
        Matcher::options(["user", "visitor", "email", "listing", "market"]),
    )?;
    m.field("treatments", Matcher::array(Kind::String))?;
    m.field_with_default("percent_exposed", Kind::Integer, json!(100))?;
    m.field("design", Matcher::nullable(Matcher::pattern("^https?://")?))?;
    m.constraint("expected percent_exposed to not exceed 100, got {}", |e| {
        let percent = e.lookup("percent_exposed");
        match percent.as_i64() {
            Some(p) if p > 100 => Some(vec![percent]),
            _ => None,
        }
    });
    Ok(())
});

fn valid_payload() -> Value {
    json!({
        "name": "button_color",
        "subject": "user",
        "treatments": ["control", "treatment"],
        "percent_exposed": 50,
        "design": "https://example.com/mock.png",
    })
}

fn invalid_payload() -> Value {
    json!({
        "name": "button_color",
        "percent_exposed": 200,
        "design": false,
    })
}

fn bench_construction(c: &mut Criterion) {
    let payload = valid_payload();
    c.bench_function("entity_construction", |b| {
        b.iter(|| EXPERIMENT.entity(black_box(payload.clone())))
    });
}

fn bench_resolution(c: &mut Criterion) {
    let entity = EXPERIMENT.entity(valid_payload());
    c.bench_function("strict_field_resolution", |b| {
        b.iter(|| entity.get(black_box("percent_exposed")).unwrap())
    });
}

fn bench_validation(c: &mut Criterion) {
    let valid = EXPERIMENT.entity(valid_payload());
    let invalid = EXPERIMENT.entity(invalid_payload());

    c.bench_function("validate_conforming_entity", |b| {
        b.iter(|| black_box(&valid).error_messages())
    });
    c.bench_function("validate_violating_entity", |b| {
        b.iter(|| black_box(&invalid).error_messages())
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_resolution,
    bench_validation
);
criterion_main!(benches);
