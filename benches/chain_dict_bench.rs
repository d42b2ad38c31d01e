use chain_dict::ChainDict;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

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
    c.bench_function("chain_dict_insert_10k", |b| {
        b.iter_batched(
            ChainDict::<String, u64>::new,
            |mut d| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    d.insert(key(x), i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("chain_dict_get_hit", |b| {
        let mut d = ChainDict::new();
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().cloned().enumerate() {
            d.insert(k, i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(d.get(k.as_str()).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chain_dict_get_miss", |b| {
        let mut d = ChainDict::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            d.insert(key(x), i as u64).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(d.try_get(k.as_str()));
        })
    });
}

// Insert-then-drain churn; the drain half crosses shrink thresholds all
// the way back down to the floor.
fn bench_churn(c: &mut Criterion) {
    c.bench_function("chain_dict_churn_4k", |b| {
        let keys: Vec<_> = lcg(23).take(4_000).map(key).collect();
        b.iter_batched(
            || keys.clone(),
            |keys| {
                let mut d = ChainDict::new();
                for (i, k) in keys.iter().cloned().enumerate() {
                    d.insert(k, i as u64).unwrap();
                }
                for k in &keys {
                    d.remove(k.as_str()).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("chain_dict_iterate_10k", |b| {
        let mut d = ChainDict::new();
        for (i, x) in lcg(31).take(10_000).enumerate() {
            d.insert(key(x), i as u64).unwrap();
        }
        b.iter(|| {
            let mut acc = 0u64;
            for (_k, v) in d.iter() {
                acc = acc.wrapping_add(*v);
            }
            black_box(acc)
        })
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_get_hit,
    bench_get_miss,
    bench_churn,
    bench_iterate
);
criterion_main!(benches);
