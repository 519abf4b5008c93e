//! Bloom filter over strings: no false negatives, tunable false positives.
//!
//! A filter is built one of three ways:
//! - [`BloomFilter::new`] with explicit sizing and fresh random seeds,
//! - [`BloomFilter::for_num_entries_and_fp_prob`] with sizing derived from a
//!   capacity and a false-positive target,
//! - [`BloomFilter::from_parts`] / the wire decoders, which take bitmap and
//!   seeds verbatim and never re-randomize.
//!
//! Membership only grows; there is no removal. Mutation needs `&mut self`, so
//! concurrent writers must be serialized by the owner (e.g. a `Mutex`).

use crate::bits::BitArray;
use crate::consts::{MAX_BITS_PER_ENTRY, MIN_BITS_PER_ENTRY, MIN_TOTAL_BITS};
use crate::errors::{Result, SieveError};
use crate::hasher::KeyedHasher;
use crate::probe::Probes;
use std::f64::consts::LN_2;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    bits: BitArray,
    bits_per_entry: u32,
    hash0: KeyedHasher,
    hash1: KeyedHasher,
}

/// `ceil(-n * ln(p) / ln(2)^2)`, at least one bit.
pub fn optimal_total_bits(expected_entries: u64, fp_probability: f64) -> u64 {
    let n = expected_entries as f64;
    let bits = (-(n * fp_probability.ln()) / (LN_2 * LN_2)).ceil();
    // `as` saturates, so absurd targets clamp to u64::MAX instead of wrapping.
    (bits as u64).max(MIN_TOTAL_BITS)
}

/// `round(m / n * ln 2)`, clamped to `[MIN_BITS_PER_ENTRY, MAX_BITS_PER_ENTRY]`.
pub fn optimal_bits_per_entry(total_bits: u64, expected_entries: u64) -> u32 {
    let k = (total_bits as f64 / expected_entries.max(1) as f64 * LN_2).round();
    (k as u32).clamp(MIN_BITS_PER_ENTRY, MAX_BITS_PER_ENTRY)
}

impl BloomFilter {
    /// Empty filter with fresh random seeds. Zero sizes are raised to one and
    /// `bits_per_entry` is capped at `MAX_BITS_PER_ENTRY`. Panics like
    /// [`BitArray::new`] on sizes that cannot be allocated; use
    /// [`BloomFilter::try_new`] to get errors instead.
    pub fn new(total_bits: u64, bits_per_entry: u32) -> Self {
        Self::with_hashers(total_bits, bits_per_entry, KeyedHasher::random(), KeyedHasher::random())
    }

    pub fn try_new(total_bits: u64, bits_per_entry: u32) -> Result<Self> {
        if total_bits < MIN_TOTAL_BITS {
            return Err(SieveError::InvalidArgument("total_bits must be positive".into()));
        }
        if !(MIN_BITS_PER_ENTRY..=MAX_BITS_PER_ENTRY).contains(&bits_per_entry) {
            return Err(SieveError::InvalidArgument(format!(
                "bits_per_entry must be in [{MIN_BITS_PER_ENTRY}, {MAX_BITS_PER_ENTRY}], got {bits_per_entry}"
            )));
        }
        Ok(Self {
            bits: BitArray::try_new(total_bits)?,
            bits_per_entry,
            hash0: KeyedHasher::random(),
            hash1: KeyedHasher::random(),
        })
    }

    /// Empty filter with caller-chosen seeds.
    pub fn with_hashers(total_bits: u64, bits_per_entry: u32, hash0: KeyedHasher, hash1: KeyedHasher) -> Self {
        Self {
            bits: BitArray::new(total_bits),
            bits_per_entry: bits_per_entry.clamp(MIN_BITS_PER_ENTRY, MAX_BITS_PER_ENTRY),
            hash0,
            hash1,
        }
    }

    /// Filter sized for `expected_entries` items at roughly `fp_probability`
    /// false positives once full.
    pub fn for_num_entries_and_fp_prob(expected_entries: u64, fp_probability: f64) -> Result<Self> {
        if expected_entries == 0 {
            return Err(SieveError::InvalidArgument("expected_entries must be at least 1".into()));
        }
        // `!(x > 0 && x < 1)` also catches NaN.
        if !(fp_probability > 0.0 && fp_probability < 1.0) {
            return Err(SieveError::InvalidArgument(format!(
                "fp_probability must be in (0, 1), got {fp_probability}"
            )));
        }
        let total_bits = optimal_total_bits(expected_entries, fp_probability);
        let bits_per_entry = optimal_bits_per_entry(total_bits, expected_entries);
        debug!(expected_entries, fp_probability, total_bits, bits_per_entry, "derived bloom filter sizing");
        Self::try_new(total_bits, bits_per_entry)
    }

    /// Reassembles a filter from already-validated parts. Nothing is rehashed
    /// or re-seeded.
    pub fn from_parts(bits: BitArray, bits_per_entry: u32, hash0: KeyedHasher, hash1: KeyedHasher) -> Result<Self> {
        if !(MIN_BITS_PER_ENTRY..=MAX_BITS_PER_ENTRY).contains(&bits_per_entry) {
            return Err(SieveError::InvalidWire(format!(
                "bits_per_entry must be in [{MIN_BITS_PER_ENTRY}, {MAX_BITS_PER_ENTRY}], got {bits_per_entry}"
            )));
        }
        Ok(Self { bits, bits_per_entry, hash0, hash1 })
    }

    #[inline]
    fn probes(&self, item: &[u8]) -> Probes {
        Probes::new(item, self.bits.total_bits(), self.bits_per_entry, &self.hash0, &self.hash1)
    }

    pub fn add(&mut self, item: impl AsRef<[u8]>) {
        for pos in self.probes(item.as_ref()) {
            self.bits.set_bit(pos);
        }
    }

    /// `false` means definitely never added; `true` means probably added.
    pub fn check(&self, item: impl AsRef<[u8]>) -> bool {
        self.probes(item.as_ref()).all(|pos| self.bits.test_bit(pos))
    }

    pub fn total_bits(&self) -> u64 { self.bits.total_bits() }
    pub fn bits_per_entry(&self) -> u32 { self.bits_per_entry }
    pub fn hash0(&self) -> &KeyedHasher { &self.hash0 }
    pub fn hash1(&self) -> &KeyedHasher { &self.hash1 }
    pub fn bitmap(&self) -> &[u8] { self.bits.raw_bytes() }

    pub fn bits_set(&self) -> u64 { self.bits.count_ones() }

    pub fn is_empty(&self) -> bool { self.bits_set() == 0 }

    /// Fraction of bits that are set.
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set().min(self.total_bits()) as f64 / self.total_bits() as f64
    }

    /// False-positive probability at the current load: fill_ratio^k.
    pub fn estimated_fp_probability(&self) -> f64 {
        self.fill_ratio().powi(self.bits_per_entry.min(i32::MAX as u32) as i32)
    }
}
