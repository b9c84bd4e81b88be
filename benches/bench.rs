// Criterion benchmarks for relief-algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use relief_algo::core::keywords::{extract_keywords, SynonymTable};
use relief_algo::core::similarity::similarity_score;
use relief_algo::models::{MatchOutcome, Resource};
use relief_algo::{haversine_distance, Matcher};

fn create_resource(id: i64, category: &str, lat: f64, lng: f64) -> Resource {
    Resource {
        id,
        name: format!("Resource {}", id),
        category: category.to_string(),
        quantity: 100 + (id % 400) as i32,
        minimum_reserve: 50,
        status: "ready".to_string(),
        latitude: lat,
        longitude: lng,
    }
}

fn create_pool(size: usize) -> Vec<Resource> {
    let categories = ["Nước uống", "Thực phẩm", "thuoc men", "cho o tam", "quan ao"];
    (0..size)
        .map(|i| {
            create_resource(
                i as i64,
                categories[i % categories.len()],
                10.0 + (i as f64 * 0.01) % 12.0,
                103.0 + (i as f64 * 0.013) % 6.0,
            )
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(16.0544),
                black_box(108.2022),
                black_box(16.4637),
                black_box(107.5909),
            )
        });
    });
}

fn bench_extract_keywords(c: &mut Criterion) {
    let table = SynonymTable::builtin();
    c.bench_function("extract_keywords", |b| {
        b.iter(|| extract_keywords(black_box("Nước uống sạch cho vùng lũ"), &table));
    });
}

fn bench_similarity_score(c: &mut Criterion) {
    let table = SynonymTable::builtin();
    let request = extract_keywords("nuoc sach", &table);
    let resource = extract_keywords("Nước uống đóng chai", &table);

    c.bench_function("similarity_score", |b| {
        b.iter(|| similarity_score(black_box(&request), black_box(&resource)));
    });
}

fn bench_rank_pool(c: &mut Criterion) {
    let matcher = Matcher::with_defaults();
    let mut group = c.benchmark_group("rank_pool");

    for size in [100usize, 1000] {
        let pool = create_pool(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| {
                let outcome = matcher.rank(
                    black_box("nuoc sach"),
                    black_box(16.0544),
                    black_box(108.2022),
                    pool.clone(),
                );
                matches!(outcome, MatchOutcome::Matched { .. })
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_extract_keywords,
    bench_similarity_score,
    bench_rank_pool
);
criterion_main!(benches);
