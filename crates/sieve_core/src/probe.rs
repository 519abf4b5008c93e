//! Kirsch-Mitzenmacher double hashing: two digests stand in for `k`
//! independent hash functions.
use crate::hasher::KeyedHasher;

/// Positions `(a + i*b) mod total_bits` for `i` in `0..k`, where `a` and `b`
/// are the two digests of the item. Arithmetic wraps at 64 bits.
#[derive(Clone, Debug)]
pub struct Probes {
    a: u64,
    b: u64,
    total_bits: u64,
    i: u32,
    k: u32,
}

impl Probes {
    pub fn new(item: &[u8], total_bits: u64, k: u32, hash0: &KeyedHasher, hash1: &KeyedHasher) -> Self {
        debug_assert!(total_bits > 0);
        Self { a: hash0.digest(item), b: hash1.digest(item), total_bits, i: 0, k }
    }
}

impl Iterator for Probes {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.i >= self.k {
            return None;
        }
        let pos = self.a.wrapping_add((self.i as u64).wrapping_mul(self.b)) % self.total_bits;
        self.i += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.k - self.i) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Probes {}

/// Convenience wrapper returning the probe sequence as a vector.
pub fn positions(item: &[u8], total_bits: u64, k: u32, hash0: &KeyedHasher, hash1: &KeyedHasher) -> Vec<u64> {
    Probes::new(item, total_bits, k, hash0, hash1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_combination_of_two_digests() {
        let (h0, h1) = (KeyedHasher::new(11, 12), KeyedHasher::new(21, 22));
        let a = h0.digest(b"Kermit");
        let b = h1.digest(b"Kermit");
        let m = 1_000_003u64;
        let got = positions(b"Kermit", m, 5, &h0, &h1);
        let want: Vec<u64> = (0..5u64).map(|i| a.wrapping_add(i.wrapping_mul(b)) % m).collect();
        assert_eq!(got, want);
        assert_eq!(got[0], a % m);
    }

    #[test]
    fn exactly_k_positions_in_range() {
        let (h0, h1) = (KeyedHasher::new(1, 2), KeyedHasher::new(3, 4));
        for k in [1u32, 2, 7, 40] {
            let p = Probes::new(b"MissPiggy", 13, k, &h0, &h1);
            assert_eq!(p.len(), k as usize);
            let v: Vec<u64> = p.collect();
            assert_eq!(v.len(), k as usize);
            assert!(v.iter().all(|&x| x < 13));
        }
    }

    #[test]
    fn single_bit_array_always_probes_zero() {
        let (h0, h1) = (KeyedHasher::new(5, 6), KeyedHasher::new(7, 8));
        assert_eq!(positions(b"", 1, 3, &h0, &h1), vec![0, 0, 0]);
    }
}
