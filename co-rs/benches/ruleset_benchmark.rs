use co_rs::{consolidate, Pattern, Rule, RuleSet};
use criterion::{criterion_group, criterion_main, Criterion};

const TEST_PATHS: &[&str] = &[
    "file-a",
    "dir-a/file-a",
    "dir-a/dir-c/file-a",
    "dir-a/dir-c/file-b",
    "dir-b/file-a",
    "dir-b/dir-d/dir-e/dir-f/dir-g/file-a",
];

const TEST_PATTERNS: &[&str] = &[
    "*",
    "*-a",
    "file-*",
    "/dir-b",
    "dir-a/dir-b",
    "**/dir-*/file-*",
    "dir-*/*",
    "dir-b/dir-d/dir-e/dir-f/dir-g/file-a",
    "dir-a/",
    "dir-a/dir-c/*.rs",
    "dir-a/dir-c/file-a",
];

fn build_ruleset(patterns: &[&str]) -> RuleSet {
    patterns
        .iter()
        .map(|&pattern| Rule::new(Pattern::new(pattern).unwrap(), vec![]))
        .collect()
}

fn ruleset_benchmark(c: &mut Criterion) {
    c.bench_function("compiling", |b| b.iter(|| build_ruleset(TEST_PATTERNS)));

    let ruleset = build_ruleset(TEST_PATTERNS);
    c.bench_function("matching", |b| {
        b.iter(|| {
            for p in TEST_PATHS {
                ruleset.matching_rule(p).unwrap();
            }
        })
    });

    c.bench_function("consolidating", |b| {
        b.iter(|| {
            let mut tree = ruleset.clone().into_tree();
            consolidate(&mut tree)
        })
    });
}

criterion_group!(benches, ruleset_benchmark);
criterion_main!(benches);
