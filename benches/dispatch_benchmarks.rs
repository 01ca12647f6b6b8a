// ABOUTME: Benchmark suite for the synchronous parts of the dispatch pipeline
// ABOUTME: Measures request building, rule validation and report aggregation

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sms_dispatch::client::{
    DispatchError, DispatchLog, DispatchReport, ProviderResponse, RequestBuilder,
};
use sms_dispatch::{FieldMap, Rule, RuleSet};

fn sample_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("user".into(), "demo".into());
    fields.insert("pass".into(), "secret".into());
    fields.insert("sid".into(), "DEMO".into());
    fields.insert("msisdn".into(), "8801711000000".into());
    fields.insert("sms".into(), "Your verification code is 123456 & expires soon".into());
    fields.insert("csmsid".into(), "1700000000".into());
    fields
}

fn sample_rules() -> RuleSet {
    RuleSet::new()
        .field("user", [Rule::Required])
        .field("pass", [Rule::Required])
        .field("sid", [Rule::Required, Rule::MaxLength(11)])
        .field(
            "msisdn",
            [
                Rule::Required,
                Rule::pattern(r"^(?:\+?88)?01[3-9]\d{8}$").expect("valid pattern"),
            ],
        )
        .field("sms", [Rule::Required, Rule::MaxLength(1000)])
        .field("csmsid", [Rule::Numeric])
}

fn benchmark_request_building(c: &mut Criterion) {
    let fields = sample_fields();
    let builder = RequestBuilder::default();

    c.bench_function("build_request", |b| {
        b.iter(|| builder.build(black_box("http://sms.example.com/pushapi"), black_box(&fields)))
    });
}

fn benchmark_validation(c: &mut Criterion) {
    let rules = sample_rules();
    let valid = sample_fields();
    let mut invalid = sample_fields();
    invalid.insert("msisdn".into(), "12345".into());
    invalid.remove("user");

    let mut group = c.benchmark_group("validation");
    group.bench_function("valid", |b| b.iter(|| rules.validate(black_box(&valid))));
    group.bench_function("invalid", |b| b.iter(|| rules.validate(black_box(&invalid))));
    group.finish();
}

fn benchmark_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for size in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut log = DispatchLog::new();
                for i in 0..size {
                    let recipient = format!("88017{i:08}");
                    if i % 5 == 0 {
                        log.record_failed(&recipient, DispatchError::transport("down").into());
                    } else {
                        log.record_sent(&recipient, ProviderResponse::accepted("OK"));
                    }
                }
                DispatchReport::from(log)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_request_building,
    benchmark_validation,
    benchmark_summarize
);
criterion_main!(benches);
