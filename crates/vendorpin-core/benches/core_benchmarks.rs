//! Benchmarks for vendorpin-core: requirement parsing, matching and selection.
//!
//! Performance targets:
//! - Requirement parse: < 2μs
//! - Single match: < 200ns
//! - Selection over 1000 candidates: < 1ms

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vendorpin_core::{
    RequirementMode, RequirementSelector, SemanticVersion, StaticVersionList, VersionRequirement,
    VersionSelector,
};

const REQUIREMENTS: &[&str] = &[
    "1.2.3",
    "^0.2",
    "~1.2.3",
    "=1.3",
    "1.2.*",
    "> 0.4, <= 0.6",
    ">=1.0.0-alpha.1, <2",
];

fn bench_requirement_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("requirement_parse");

    for requirement in REQUIREMENTS {
        group.bench_with_input(
            BenchmarkId::from_parameter(requirement),
            requirement,
            |b, req| b.iter(|| VersionRequirement::parse(black_box(req))),
        );
    }

    group.bench_function("epoch", |b| {
        b.iter(|| VersionRequirement::parse_with_mode(black_box("0.2"), RequirementMode::Epoch))
    });

    group.finish();
}

fn bench_requirement_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("requirement_match");
    let candidate = SemanticVersion::parse("1.2.7").unwrap();

    for requirement in REQUIREMENTS {
        let parsed = VersionRequirement::parse(requirement).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(requirement),
            &parsed,
            |b, req| b.iter(|| req.matches(black_box(&candidate))),
        );
    }

    group.bench_function("fulfills_with_parse", |b| {
        let req = VersionRequirement::parse("~1.2.3").unwrap();
        b.iter(|| req.fulfills(black_box("1.2.9-rc.1")))
    });

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    for size in [10usize, 100, 1000] {
        let versions: Vec<String> = (0..size)
            .map(|i| format!("{}.{}.{}", i / 100, (i / 10) % 10, i % 10))
            .collect();
        let list = StaticVersionList::new("bench", versions);
        let selector = RequirementSelector::new("^1").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &list, |b, list| {
            b.iter(|| runtime.block_on(selector.select(black_box(list), None)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_requirement_parse,
    bench_requirement_match,
    bench_selection
);
criterion_main!(benches);
