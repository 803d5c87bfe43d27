//! End-to-end encode/decode benchmarks over representative value
//! distributions, one per wire scheme plus the adaptive default.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use intmap::bridge;
use intmap::config::CodecConfig;
use intmap::container::{array, map};
use intmap::Scheme;

fn fixtures() -> Vec<(&'static str, Vec<i64>)> {
    vec![
        ("small_dense", (0..4096).map(|i| (i * 7) % 61).collect()),
        ("timestamps", (0..4096).map(|i| 1_700_000_000 + 30 * i).collect()),
        (
            "sparse_magnitudes",
            (0..4096)
                .map(|i| if i % 97 == 0 { 1 << 45 } else { i % 13 })
                .collect(),
        ),
        ("signed_noise", (0..4096).map(|i| (i * i * 31) % 4001 - 2000).collect()),
    ]
}

fn bench_array_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_encode");
    for (name, values) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| array::encode(black_box(&values), &CodecConfig::default()).unwrap())
        });
    }
    for scheme in [Scheme::Varint, Scheme::Bitpack, Scheme::Delta] {
        let values: Vec<i64> = (0..4096).collect();
        let config = CodecConfig::forcing(scheme);
        group.bench_function(format!("forced_{scheme}"), |b| {
            b.iter(|| array::encode(black_box(&values), &config).unwrap())
        });
    }
    group.finish();
}

fn bench_array_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_decode");
    for (name, values) in fixtures() {
        let bytes = array::encode(&values, &CodecConfig::default()).unwrap();
        group.bench_function(name, |b| b.iter(|| array::decode(black_box(&bytes)).unwrap()));
    }
    group.finish();
}

fn bench_map_lookup(c: &mut Criterion) {
    let keys: Vec<i64> = (0..4096).map(|i| i * 3).collect();
    let values: Vec<i64> = (0..4096).map(|i| 1_000_000 - i).collect();
    let bytes = map::encode(&keys, &values, &CodecConfig::default()).unwrap();

    c.bench_function("map_get_hit_last", |b| {
        b.iter(|| bridge::map_get(black_box(&bytes), 4095 * 3).unwrap())
    });
    c.bench_function("map_get_miss", |b| {
        b.iter(|| bridge::map_get(black_box(&bytes), 1).unwrap())
    });
}

fn bench_setup(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    bench_array_encode(c);
    bench_array_decode(c);
    bench_map_lookup(c);
}

criterion_group!(benches, bench_setup);
criterion_main!(benches);
