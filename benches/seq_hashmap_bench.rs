use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use seq_hashmap::SeqHashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("seq_hashmap_insert_10k", |b| {
        b.iter_batched(
            SeqHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("seq_hashmap_get_hit", |b| {
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        let m: SeqHashMap<String, u64> = keys
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, k)| (k, i as u64))
            .collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("seq_hashmap_get_miss", |b| {
        let m: SeqHashMap<String, u64> = lcg(11)
            .take(10_000)
            .enumerate()
            .map(|(i, x)| (key(x), i as u64))
            .collect();
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(m.get(&k));
        })
    });
}

fn bench_insert_remove_churn(c: &mut Criterion) {
    c.bench_function("seq_hashmap_insert_remove_churn", |b| {
        let mut m: SeqHashMap<u64, u64> = (0..4_096).map(|i| (i, i)).collect();
        let mut next = 4_096u64;
        b.iter(|| {
            m.remove(&(next - 4_096));
            m.insert(next, next);
            next += 1;
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("seq_hashmap_iterate_10k", |b| {
        let m: SeqHashMap<u64, u64> = (0..10_000).map(|i| (i, i)).collect();
        b.iter(|| black_box(m.values().sum::<u64>()))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_insert_remove_churn, bench_iterate
}
criterion_main!(benches);
