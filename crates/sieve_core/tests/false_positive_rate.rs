use sieve_core::{BloomFilter, KeyedHasher};

#[test]
fn no_false_negatives() {
    for (n, p) in [(1u64, 0.5), (10, 0.1), (500, 0.001)] {
        let mut bf = BloomFilter::for_num_entries_and_fp_prob(n, p).unwrap();
        let items: Vec<String> = (0..n * 3).map(|i| format!("item/{i}")).collect();
        for s in &items {
            bf.add(s);
        }
        assert!(items.iter().all(|s| bf.check(s)));
    }
}

#[test]
fn empirical_rate_tracks_target() {
    let n = 2_000u64;
    let target = 0.01;
    // Fixed seeds keep the run reproducible; sizing is the derived one.
    let sized = BloomFilter::for_num_entries_and_fp_prob(n, target).unwrap();
    let mut bf = BloomFilter::with_hashers(
        sized.total_bits(),
        sized.bits_per_entry(),
        KeyedHasher::new(0x243f6a8885a308d3, 0x13198a2e03707344),
        KeyedHasher::new(0xa4093822299f31d0, 0x082efa98ec4e6c89),
    );
    assert_eq!((bf.total_bits(), bf.bits_per_entry()), (19171, 7));
    for i in 0..n {
        bf.add(format!("inserted:{i}"));
    }

    let trials = 20_000;
    let hits = (0..trials).filter(|i| bf.check(format!("absent:{i}"))).count();
    let rate = hits as f64 / trials as f64;
    // Expected ~0.01 with sd ~0.0007; generous bound for a randomized test.
    assert!(rate < target * 3.0, "observed false-positive rate {rate}");

    let est = bf.estimated_fp_probability();
    assert!(est > target / 3.0 && est < target * 3.0, "estimate {est}");
    assert!(bf.fill_ratio() > 0.3 && bf.fill_ratio() < 0.7);
}
