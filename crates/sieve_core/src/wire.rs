//! Canonical JSON wire format.
//!
//! ```text
//! {
//!   "bitmap": "<base64, bit i in byte i/8 at LSB-first position i%8>",
//!   "total_bits": <u64 > 0>,
//!   "bits_per_entry": <u32 > 0>,
//!   "hash0": {"k0": <u64>, "k1": <u64>},
//!   "hash1": {"k0": <u64>, "k1": <u64>}
//! }
//! ```
//!
//! Unknown fields at any level are ignored so newer writers stay readable.
//! Decoding is all-or-nothing: either every field validates or no filter is
//! produced.

use crate::bits::BitArray;
use crate::errors::{Result, SieveError};
use crate::filter::BloomFilter;
use crate::hasher::KeyedHasher;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Reads only from a JSON object; arrays are rejected at every level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireFilter {
    pub bitmap: String,
    pub total_bits: u64,
    pub bits_per_entry: u32,
    pub hash0: KeyedHasher,
    pub hash1: KeyedHasher,
}

impl<'de> Deserialize<'de> for WireFilter {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        struct WireVisitor;

        fn put<T, E: de::Error>(slot: &mut Option<T>, name: &'static str, value: T) -> std::result::Result<(), E> {
            if slot.replace(value).is_some() {
                return Err(E::duplicate_field(name));
            }
            Ok(())
        }

        impl<'de> Visitor<'de> for WireVisitor {
            type Value = WireFilter;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a bloom filter object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<WireFilter, A::Error> {
                let mut bitmap = None;
                let mut total_bits = None;
                let mut bits_per_entry = None;
                let mut hash0 = None;
                let mut hash1 = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "bitmap" => put::<_, A::Error>(&mut bitmap, "bitmap", map.next_value::<String>()?)?,
                        "total_bits" => put::<_, A::Error>(&mut total_bits, "total_bits", map.next_value::<u64>()?)?,
                        "bits_per_entry" => put::<_, A::Error>(&mut bits_per_entry, "bits_per_entry", map.next_value::<u32>()?)?,
                        "hash0" => put::<_, A::Error>(&mut hash0, "hash0", map.next_value::<KeyedHasher>()?)?,
                        "hash1" => put::<_, A::Error>(&mut hash1, "hash1", map.next_value::<KeyedHasher>()?)?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(WireFilter {
                    bitmap: bitmap.ok_or_else(|| de::Error::missing_field("bitmap"))?,
                    total_bits: total_bits.ok_or_else(|| de::Error::missing_field("total_bits"))?,
                    bits_per_entry: bits_per_entry.ok_or_else(|| de::Error::missing_field("bits_per_entry"))?,
                    hash0: hash0.ok_or_else(|| de::Error::missing_field("hash0"))?,
                    hash1: hash1.ok_or_else(|| de::Error::missing_field("hash1"))?,
                })
            }
        }

        d.deserialize_map(WireVisitor)
    }
}

impl WireFilter {
    /// Validates and rebuilds the filter. Seeds and bitmap are adopted as-is.
    pub fn into_filter(self) -> Result<BloomFilter> {
        if self.total_bits == 0 {
            return Err(SieveError::InvalidWire("total_bits must be positive".into()));
        }
        let bytes = STANDARD.decode(self.bitmap.as_bytes())?;
        let bits = BitArray::from_raw_bytes(bytes, self.total_bits)?;
        BloomFilter::from_parts(bits, self.bits_per_entry, self.hash0, self.hash1)
    }
}

impl From<&BloomFilter> for WireFilter {
    fn from(bf: &BloomFilter) -> Self {
        WireFilter {
            bitmap: STANDARD.encode(bf.bitmap()),
            total_bits: bf.total_bits(),
            bits_per_entry: bf.bits_per_entry(),
            hash0: *bf.hash0(),
            hash1: *bf.hash1(),
        }
    }
}

impl BloomFilter {
    pub fn to_wire(&self) -> WireFilter {
        WireFilter::from(self)
    }

    pub fn from_wire(wire: WireFilter) -> Result<Self> {
        let bf = wire.into_filter().inspect_err(|e| warn!(error = %e, "rejected bloom filter wire structure"))?;
        debug!(total_bits = bf.total_bits(), bits_per_entry = bf.bits_per_entry(), "reconstructed bloom filter");
        Ok(bf)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire())?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let wire: WireFilter = serde_json::from_str(text)
            .inspect_err(|e| warn!(error = %e, "bloom filter JSON did not parse"))?;
        Self::from_wire(wire)
    }

    /// Writes the JSON form through a temp file in the same directory, then
    /// renames it over `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new().prefix(".sieve_").tempfile_in(dir)?;
        tmp.write_all(self.to_json()?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
