//! Keyed 64-bit digest bound to a fixed 128-bit seed.
use rand::Rng;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;
use std::fmt;
use std::hash::Hasher;

/// One SipHash-2-4 instance. The seed words are stored exactly as given so a
/// filter reconstructed from the wire hashes identically to the one that
/// produced it.
///
/// Deserializes only from a map (`{"k0": .., "k1": ..}`); the positional
/// array form serde would otherwise accept is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct KeyedHasher {
    pub k0: u64,
    pub k1: u64,
}

impl KeyedHasher {
    pub const fn new(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }

    /// Fresh seed words from the thread-local CSPRNG.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self { k0: rng.random(), k1: rng.random() }
    }

    #[inline]
    pub fn digest(&self, item: &[u8]) -> u64 {
        let mut h = SipHasher24::new_with_keys(self.k0, self.k1);
        h.write(item);
        h.finish()
    }
}

impl<'de> Deserialize<'de> for KeyedHasher {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct SeedVisitor;

        impl<'de> Visitor<'de> for SeedVisitor {
            type Value = KeyedHasher;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object with u64 fields k0 and k1")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<KeyedHasher, A::Error> {
                let (mut k0, mut k1) = (None, None);
                while let Some(key) = map.next_key::<String>()? {
                    let slot = match key.as_str() {
                        "k0" => &mut k0,
                        "k1" => &mut k1,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                            continue;
                        }
                    };
                    if slot.is_some() {
                        return Err(de::Error::custom(format_args!("duplicate field `{key}`")));
                    }
                    *slot = Some(map.next_value::<u64>()?);
                }
                Ok(KeyedHasher {
                    k0: k0.ok_or_else(|| de::Error::missing_field("k0"))?,
                    k1: k1.ok_or_else(|| de::Error::missing_field("k1"))?,
                })
            }
        }

        d.deserialize_map(SeedVisitor)
    }
}
