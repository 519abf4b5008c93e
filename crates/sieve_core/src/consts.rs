// crates/sieve_core/src/consts.rs

/// Smallest bit array a filter will allocate.
pub const MIN_TOTAL_BITS: u64 = 1;
/// Largest bit array: its byte length always fits an allocation request
/// (`isize::MAX`) on every target.
pub const MAX_TOTAL_BITS: u64 = isize::MAX as u64;
/// Every item sets at least one bit.
pub const MIN_BITS_PER_ENTRY: u32 = 1;
/// Probes per item are capped so a decoded filter cannot make `check` spin.
pub const MAX_BITS_PER_ENTRY: u32 = i16::MAX as u32;

pub const BITS_PER_BYTE: u64 = 8;

/// Number of bytes needed to pack `total_bits` bits. Only exact for
/// `total_bits <= MAX_TOTAL_BITS`.
#[inline]
pub const fn bitmap_len(total_bits: u64) -> usize {
    total_bits.div_ceil(BITS_PER_BYTE) as usize
}

const _: () = { assert!(bitmap_len(32) == 4 && bitmap_len(33) == 5); };
const _: () = { assert!(bitmap_len(MAX_TOTAL_BITS) <= isize::MAX as usize); };
