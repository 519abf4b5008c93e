use crate::errors::{Result, SieveError};
use crate::filter::BloomFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a fresh filter is sized. Either variant is accepted in a config file;
/// the field names tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sizing {
    Accuracy { expected_entries: u64, fp_probability: f64 },
    Explicit { total_bits: u64, bits_per_entry: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(flatten)]
    pub sizing: Sizing,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { sizing: Sizing::Accuracy { expected_entries: 10_000, fp_probability: 0.01 } }
    }
}

impl FilterConfig {
    pub fn accuracy(expected_entries: u64, fp_probability: f64) -> Self {
        Self { sizing: Sizing::Accuracy { expected_entries, fp_probability } }
    }

    pub fn explicit(total_bits: u64, bits_per_entry: u32) -> Self {
        Self { sizing: Sizing::Explicit { total_bits, bits_per_entry } }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }

    /// New empty filter with fresh seeds.
    pub fn build(&self) -> Result<BloomFilter> {
        match self.sizing {
            Sizing::Accuracy { expected_entries, fp_probability } => {
                BloomFilter::for_num_entries_and_fp_prob(expected_entries, fp_probability)
            }
            Sizing::Explicit { total_bits, bits_per_entry } => BloomFilter::try_new(total_bits, bits_per_entry),
        }
    }
}

impl TryFrom<&FilterConfig> for BloomFilter {
    type Error = SieveError;

    fn try_from(cfg: &FilterConfig) -> Result<Self> {
        cfg.build()
    }
}
