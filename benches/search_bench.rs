//! Benchmark of the hybrid search hot path over a synthetic corpus.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use rolesearch::chunking::ChunkingConfig;
use rolesearch::corpus::RoleCorpus;
use rolesearch::hybrid::{HybridSearcher, SearchRequest};
use rolesearch::index::IndexBuilder;

fn synthetic_corpus(roles: usize, words_per_role: usize) -> RoleCorpus {
    let mut map = serde_json::Map::new();
    for role in 0..roles {
        let number = format!("{:04}.{:04}", 1000 + role, 100 + role);
        let description = (0..words_per_role)
            .map(|word| format!("term{} topic{}", (role * 31 + word) % 500, word % 40))
            .collect::<Vec<_>>()
            .join(" ");
        map.insert(number, serde_json::Value::String(description));
    }
    RoleCorpus::from_json_value(&serde_json::Value::Object(map)).unwrap()
}

fn bench_search(c: &mut Criterion) {
    let corpus = synthetic_corpus(200, 120);
    let chunking = ChunkingConfig::new(50, 10).unwrap();
    let index = IndexBuilder::new().chunking(chunking).build(&corpus).unwrap();
    let searcher = HybridSearcher::new(index);
    let request = SearchRequest::new("term42 topic7 term99").top_k(10);

    c.bench_function("hybrid_search_200_roles", |b| {
        b.iter(|| {
            let response = searcher.search(black_box(&request)).unwrap();
            black_box(response);
        })
    });
}

fn bench_index_build(c: &mut Criterion) {
    let corpus = synthetic_corpus(50, 120);
    let chunking = ChunkingConfig::new(50, 10).unwrap();

    c.bench_function("index_build_50_roles", |b| {
        b.iter(|| {
            let index = IndexBuilder::new()
                .chunking(chunking)
                .build(black_box(&corpus))
                .unwrap();
            black_box(index);
        })
    });
}

criterion_group!(benches, bench_search, bench_index_build);
criterion_main!(benches);
