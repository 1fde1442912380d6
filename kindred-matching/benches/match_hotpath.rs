use criterion::{criterion_group, criterion_main, Criterion};
use kindred_core::{ArchetypeCatalog, EngineConfig, TraitDimension, TraitVector};
use kindred_matching::find_best_matches;
use std::hint::black_box;

fn bench_find_best_matches(c: &mut Criterion) {
    let config = EngineConfig::standard();
    let catalog = ArchetypeCatalog::standard();
    let traits = TraitVector::neutral()
        .with(TraitDimension::SocialEnergy, 82.0)
        .with(TraitDimension::Openness, 71.0)
        .with(TraitDimension::Assertiveness, 64.0);

    c.bench_function("matching/find_best_matches", |b| {
        b.iter(|| {
            let matches = find_best_matches(black_box(&traits), None, 3, catalog, &config);
            black_box(matches.len());
        });
    });
}

criterion_group!(benches, bench_find_best_matches);
criterion_main!(benches);
