use autogloss_engine::{Annotator, AnnotatorConfig, ExcludedTags};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    group.sample_size(10);

    let catalog = common::generate_catalog(200);
    let content = common::generate_article(100);
    let annotator = Annotator::new(AnnotatorConfig {
        excluded_tags: ExcludedTags::extended(),
        ..AnnotatorConfig::default()
    });

    group.bench_function("full_pass", |b| {
        b.iter(|| {
            let result = annotator.annotate(std::hint::black_box(&content), &catalog);
            std::hint::black_box(result);
        });
    });

    group.bench_function("no_matches", |b| {
        let plain = "<p>Nothing relevant in this paragraph.</p>\n".repeat(100);
        b.iter(|| {
            let result = annotator.annotate(std::hint::black_box(&plain), &catalog);
            std::hint::black_box(result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_annotate);
criterion_main!(benches);
