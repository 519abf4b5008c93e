use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sieve_core::BloomFilter;

fn bench_filter(c: &mut Criterion) {
    let keys: Vec<String> = (0..10_000).map(|i| format!("key-{i}")).collect();
    let mut bf = BloomFilter::for_num_entries_and_fp_prob(keys.len() as u64, 0.01).unwrap();
    for k in &keys {
        bf.add(k);
    }
    let json = bf.to_json().unwrap();

    c.bench_function("add", |bch| {
        let mut f = bf.clone();
        bch.iter(|| f.add(black_box("Kermit")))
    });
    c.bench_function("check_hit", |bch| bch.iter(|| black_box(bf.check(black_box("key-42")))));
    c.bench_function("check_miss", |bch| bch.iter(|| black_box(bf.check(black_box("Gonzo")))));
    c.bench_function("to_json", |bch| bch.iter(|| black_box(bf.to_json().unwrap())));
    c.bench_function("from_json", |bch| bch.iter(|| black_box(BloomFilter::from_json(&json).unwrap())));
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
