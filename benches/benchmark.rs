// Performance benchmarks for the recommendation paths
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use metricrec_classify::{AffinityExpander, CategoryAffinities, CategoryAffinity};
use metricrec_core::{
    MetricCatalog, MetricEntry, Profile, TextVectorizer, TfidfVectorizer, Vector, CATEGORIES,
};
use metricrec_schema::{FeatureDef, FeatureSchema, ProfileNormalizer};
use metricrec_similarity::{Corpus, CorpusProfile, FeatureWeights, WeightedSimilarityEngine};
use rand::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

const ROLES: [&str; 5] = ["Developer", "Scrum Master", "Product Owner", "Tester", "Tech Lead"];
const FLAGS: [&str; 6] = [
    "agile_methods_scrum",
    "agile_methods_kanban",
    "agile_methods_xp",
    "use_metrics_daily",
    "use_metrics_retro",
    "use_metrics_review",
];

fn random_profile(rng: &mut impl Rng) -> Profile {
    let mut profile = Profile::new().with("role", ROLES[rng.random_range(0..ROLES.len())]);
    for flag in FLAGS {
        profile.insert(flag, if rng.random_bool(0.5) { 1.0 } else { 0.0 });
    }
    profile
}

fn catalog(n: usize) -> Arc<MetricCatalog> {
    let descriptions = (0..n)
        .map(|i| MetricEntry {
            name: format!("Metric {}", i),
            description: format!("description of metric {}", i),
        })
        .collect::<Vec<_>>();
    let categories = CATEGORIES
        .iter()
        .map(|c| {
            let metrics = (0..n / CATEGORIES.len())
                .map(|i| Some(format!("Metric {}", i)))
                .collect();
            (c.label.to_string(), metrics)
        })
        .collect::<Vec<(String, Vec<Option<String>>)>>();
    Arc::new(MetricCatalog::new(descriptions, categories))
}

fn weighted_engine(size: usize) -> WeightedSimilarityEngine {
    let mut rng = rand::rng();
    let mut features = vec![FeatureDef::text("role")];
    features.extend(FLAGS.iter().map(|f| FeatureDef::binary(*f)));

    let profiles = (0..size)
        .map(|i| {
            CorpusProfile::new(
                i as i64,
                random_profile(&mut rng),
                Some(format!("Metric {}", rng.random_range(0..60))),
            )
        })
        .collect();
    let corpus = Corpus::new(features, profiles).unwrap();

    let vectorizer: Arc<dyn TextVectorizer> = Arc::new(TfidfVectorizer::fit(&ROLES));
    WeightedSimilarityEngine::new(
        Arc::new(corpus),
        &HashMap::from([("role".to_string(), vectorizer)]),
        FeatureWeights::profile_defaults(),
        catalog(60),
    )
    .unwrap()
}

fn benchmark_weighted_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_similarity");

    for size in [100, 1000, 10000].iter() {
        let engine = weighted_engine(*size);
        let query = random_profile(&mut rand::rng());

        group.bench_with_input(BenchmarkId::new("recommend", size), size, |b, _| {
            b.iter(|| {
                let recs = engine.recommend(black_box(&query), 5, None).unwrap();
                black_box(recs);
            });
        });
    }

    group.finish();
}

fn benchmark_normalize(c: &mut Criterion) {
    let schema = FeatureSchema::for_profile(&ROLES, &["Small", "Medium", "Large"], &["1-3", "3-5", "5+"]);
    let normalizer = ProfileNormalizer::new(schema).unwrap();
    let profile = random_profile(&mut rand::rng()).with("org_size", "Medium");

    c.bench_function("normalize_profile", |b| {
        b.iter(|| {
            let vector = normalizer.normalize(black_box(&profile)).unwrap();
            black_box(vector);
        });
    });
}

fn benchmark_expand(c: &mut Criterion) {
    let expander = AffinityExpander::new(catalog(600));
    let mut rng = rand::rng();
    let affinities = CategoryAffinities::new(
        CATEGORIES
            .iter()
            .map(|c| CategoryAffinity {
                category: *c,
                affinity: rng.random_range(0.0f32..1.0f32),
            })
            .collect(),
    );

    c.bench_function("expand_affinities", |b| {
        b.iter(|| {
            let recs = expander.expand(black_box(&affinities), 0.3);
            black_box(recs);
        });
    });
}

fn benchmark_cosine(c: &mut Criterion) {
    let mut rng = rand::rng();
    let a = Vector::new((0..512).map(|_| rng.random_range(-1.0f32..1.0f32)).collect());
    let b_vec = Vector::new((0..512).map(|_| rng.random_range(-1.0f32..1.0f32)).collect());

    c.bench_function("cosine_512", |b| {
        b.iter(|| black_box(a.cosine_similarity(black_box(&b_vec))));
    });
}

criterion_group!(
    benches,
    benchmark_weighted_similarity,
    benchmark_normalize,
    benchmark_expand,
    benchmark_cosine
);
criterion_main!(benches);
