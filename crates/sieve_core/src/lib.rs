pub mod bits;
pub mod config;
pub mod consts;
pub mod errors;
pub mod filter;
pub mod hasher;
pub mod probe;
pub mod wire;

pub use bits::BitArray;
pub use config::{FilterConfig, Sizing};
pub use errors::{Result, SieveError};
pub use filter::{optimal_bits_per_entry, optimal_total_bits, BloomFilter};
pub use hasher::KeyedHasher;
pub use probe::{positions, Probes};
pub use wire::WireFilter;
