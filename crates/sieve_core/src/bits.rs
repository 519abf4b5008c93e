//! Fixed-size bit vector packed into bytes.
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8`, counting from the
//! least-significant bit. That layout is what goes over the wire, so it
//! must never change.

use crate::consts::{bitmap_len, BITS_PER_BYTE, MAX_TOTAL_BITS, MIN_TOTAL_BITS};
use crate::errors::{Result, SieveError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    total_bits: u64,
    bytes: Vec<u8>,
}

impl BitArray {
    /// Zero-filled array of `total_bits` bits (raised to at least one).
    ///
    /// Panics above `MAX_TOTAL_BITS` and aborts if the allocation fails, like
    /// `vec!`. [`BitArray::try_new`] reports both instead.
    pub fn new(total_bits: u64) -> Self {
        let total_bits = total_bits.max(MIN_TOTAL_BITS);
        assert!(total_bits <= MAX_TOTAL_BITS, "total_bits {total_bits} exceeds {MAX_TOTAL_BITS}");
        Self { total_bits, bytes: vec![0u8; bitmap_len(total_bits)] }
    }

    pub fn try_new(total_bits: u64) -> Result<Self> {
        if total_bits < MIN_TOTAL_BITS || total_bits > MAX_TOTAL_BITS {
            return Err(SieveError::InvalidArgument(format!(
                "total_bits must be in [{MIN_TOTAL_BITS}, {MAX_TOTAL_BITS}], got {total_bits}"
            )));
        }
        let len = bitmap_len(total_bits);
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|e| {
            SieveError::InvalidArgument(format!("cannot allocate {len} bytes for {total_bits} bits: {e}"))
        })?;
        bytes.resize(len, 0u8);
        Ok(Self { total_bits, bytes })
    }

    /// Adopts packed bytes verbatim. The length must match `total_bits` exactly.
    pub fn from_raw_bytes(bytes: Vec<u8>, total_bits: u64) -> Result<Self> {
        if total_bits < MIN_TOTAL_BITS {
            return Err(SieveError::InvalidWire("total_bits must be positive".into()));
        }
        if total_bits > MAX_TOTAL_BITS {
            return Err(SieveError::InvalidWire(format!("total_bits must not exceed {MAX_TOTAL_BITS}")));
        }
        let expected = bitmap_len(total_bits);
        if bytes.len() != expected {
            return Err(SieveError::BitmapLength { expected, actual: bytes.len() });
        }
        Ok(Self { total_bits, bytes })
    }

    #[inline]
    pub fn total_bits(&self) -> u64 { self.total_bits }

    #[inline]
    pub fn raw_bytes(&self) -> &[u8] { &self.bytes }

    #[inline]
    fn locate(&self, index: u64) -> (usize, u8) {
        assert!(index < self.total_bits, "bit {index} out of range (total_bits={})", self.total_bits);
        ((index / BITS_PER_BYTE) as usize, 1u8 << (index % BITS_PER_BYTE))
    }

    /// Panics if `index >= total_bits`.
    #[inline]
    pub fn set_bit(&mut self, index: u64) {
        let (idx, mask) = self.locate(index);
        self.bytes[idx] |= mask;
    }

    /// Panics if `index >= total_bits`.
    #[inline]
    pub fn test_bit(&self, index: u64) -> bool {
        let (idx, mask) = self.locate(index);
        self.bytes[idx] & mask != 0
    }

    /// Population count. Padding bits in the last byte are never set by
    /// `set_bit`, but bytes adopted from the wire are counted as given.
    pub fn count_ones(&self) -> u64 {
        self.bytes.iter().map(|b| b.count_ones() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsb_first_within_byte() {
        let mut b = BitArray::new(16);
        b.set_bit(0);
        b.set_bit(9);
        b.set_bit(15);
        assert_eq!(b.raw_bytes(), &[0b0000_0001, 0b1000_0010]);
        assert!(b.test_bit(9));
        assert!(!b.test_bit(8));
    }

    #[test]
    fn partial_last_byte() {
        let mut b = BitArray::new(10);
        assert_eq!(b.raw_bytes().len(), 2);
        b.set_bit(9);
        b.set_bit(9);
        assert_eq!(b.raw_bytes(), &[0, 0b10]);
        assert_eq!(b.count_ones(), 1);
    }

    #[test]
    fn zero_bits_is_raised_to_one() {
        let b = BitArray::new(0);
        assert_eq!(b.total_bits(), 1);
        assert_eq!(b.raw_bytes(), &[0]);
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        BitArray::new(8).test_bit(8);
    }

    #[test]
    fn from_raw_bytes_checks_length() {
        let b = BitArray::from_raw_bytes(vec![0x27, 0xe8, 0xb9, 0x32], 32).unwrap();
        assert!(b.test_bit(0) && b.test_bit(1) && b.test_bit(2) && !b.test_bit(3));
        assert!(b.test_bit(29) && !b.test_bit(31));

        match BitArray::from_raw_bytes(vec![0; 3], 32) {
            Err(SieveError::BitmapLength { expected: 4, actual: 3 }) => {}
            other => panic!("unexpected {other:?}"),
        }
        assert!(BitArray::from_raw_bytes(vec![], 0).is_err());
        assert!(matches!(BitArray::from_raw_bytes(vec![0; 4], u64::MAX), Err(SieveError::InvalidWire(_))));
    }

    #[test]
    fn try_new_rejects_unallocatable_sizes() {
        assert_eq!(BitArray::try_new(10).unwrap(), BitArray::new(10));
        for bits in [0, MAX_TOTAL_BITS + 1, u64::MAX] {
            assert!(matches!(BitArray::try_new(bits), Err(SieveError::InvalidArgument(_))), "{bits}");
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn try_new_reports_allocation_failure() {
        // 2^59 bytes is past any 64-bit address space in use today.
        assert!(matches!(BitArray::try_new(1 << 62), Err(SieveError::InvalidArgument(_))));
    }
}
