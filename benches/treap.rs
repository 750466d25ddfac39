#[macro_use]
extern crate criterion;
extern crate persistent_treap;
extern crate rand;

use criterion::{black_box, Criterion};
use persistent_treap::treap::{PersistentMap, PersistentSet};
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 10_000;

fn build_sets() -> (PersistentSet<u32>, PersistentSet<u32>) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut left = PersistentSet::new();
    let mut right = PersistentSet::new();
    let mut start = 0;
    for _ in 0..NUM_OF_OPERATIONS / 2 {
        start += rng.gen_range(1, 100);
        left.insert(start);
        start += rng.gen_range(1, 100);
        right.insert(start);
        start += rng.gen_range(1, 100);
        left.insert(start);
        right.insert(start);
    }
    (left, right)
}

fn bench_persistent_map_insert(c: &mut Criterion) {
    c.bench_function("bench persistent map insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = PersistentMap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                let key = rng.next_u32();
                let val = rng.next_u32();

                map.insert(key, val);
            }
        })
    });
}

fn bench_persistent_map_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = PersistentMap::new();
    let mut values = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        let val = rng.next_u32();

        map.insert(key, val);
        values.push(key);
    }

    c.bench_function("bench persistent map get", move |b| {
        b.iter(|| {
            for key in &values {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_persistent_set_union(c: &mut Criterion) {
    let (left, right) = build_sets();
    c.bench_function("bench persistent set union", move |b| {
        b.iter(|| black_box(left.union(&right)))
    });
}

fn bench_persistent_set_intersection(c: &mut Criterion) {
    let (left, right) = build_sets();
    c.bench_function("bench persistent set intersection", move |b| {
        b.iter(|| black_box(left.intersection(&right)))
    });
}

fn bench_persistent_set_difference(c: &mut Criterion) {
    let (left, right) = build_sets();
    c.bench_function("bench persistent set difference", move |b| {
        b.iter(|| black_box(left.difference(&right)))
    });
}

fn bench_btreeset_intersection(c: &mut Criterion) {
    let (left, right) = build_sets();
    let left = left.iter().cloned().collect::<BTreeSet<u32>>();
    let right = right.iter().cloned().collect::<BTreeSet<u32>>();
    c.bench_function("bench btreeset intersection", move |b| {
        b.iter(|| black_box(left.intersection(&right).cloned().collect::<BTreeSet<u32>>()))
    });
}

criterion_group!(
    benches,
    bench_persistent_map_insert,
    bench_persistent_map_get,
    bench_persistent_set_union,
    bench_persistent_set_intersection,
    bench_persistent_set_difference,
    bench_btreeset_intersection,
);
criterion_main!(benches);
