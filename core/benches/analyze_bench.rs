use criterion::{criterion_group, criterion_main, Criterion};
use spimi_core::analyze::{Analyzer, AnalyzerOptions};

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::new(AnalyzerOptions::default());
    let text = "The price of rubber rose sharply after traders in Kuala Lumpur \
                reported lower than expected output for 1987, Reuters said. "
        .repeat(64);
    c.bench_function("analyze_newswire", |b| b.iter(|| analyzer.analyze(&text)));
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
