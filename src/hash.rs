use crate::error::{FilterError, Result};
use fnv::FnvHasher;
use murmur3::murmur3_32;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use std::io::Cursor;

/// Largest vector size the hash family can address (32-bit hash output).
pub const MAX_VECTOR_SIZE: usize = u32::MAX as usize;

/// Selects the algorithm used to map a key onto filter positions.
///
/// Every scheme is deterministic: the same `(key, num_hashes, vector_size)`
/// always yields the same ordered positions, so `add` followed by
/// `membership_test` on the same key addresses the same counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashScheme {
    /// Chained murmur3: each hash is seeded with the previous one,
    /// starting from seed 0.
    #[default]
    Murmur3,
    /// Kirsch-Mitzenmacher double hashing over murmur3 and FNV-1a:
    /// `h1 + i * h2`.
    DoubleHashing,
}

impl HashScheme {
    /// Computes `num_hashes` positions in `[0, vector_size)` for `key`.
    ///
    /// Fails with [`FilterError::EmptyKey`] for an empty key.
    pub fn positions(
        &self,
        key: &[u8],
        num_hashes: usize,
        vector_size: usize,
    ) -> Result<Vec<usize>> {
        if key.is_empty() {
            return Err(FilterError::EmptyKey);
        }
        if vector_size == 0 {
            return Err(FilterError::InvalidConfig(
                "Vector size must be > 0".into(),
            ));
        }

        let modulus = vector_size as u64;
        match self {
            HashScheme::Murmur3 => {
                let mut seed = 0u32;
                let mut positions = Vec::with_capacity(num_hashes);
                for _ in 0..num_hashes {
                    seed = hash_murmur32(key, seed)?;
                    positions.push((seed as u64 % modulus) as usize);
                }
                Ok(positions)
            }
            HashScheme::DoubleHashing => {
                let h1 = hash_murmur32(key, 0)?;
                let h2 = hash_fnv32(key);
                Ok((0..num_hashes)
                    .map(|i| {
                        let h = h1.wrapping_add((i as u32).wrapping_mul(h2));
                        (h as u64 % modulus) as usize
                    })
                    .collect())
            }
        }
    }
}

pub(crate) fn hash_murmur32(key: &[u8], seed: u32) -> Result<u32> {
    let mut cursor = Cursor::new(key);
    Ok(murmur3_32(&mut cursor, seed)?)
}

pub(crate) fn hash_fnv32(key: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish() as u32
}

/// Vector size giving `fpr` false positives for `n` elements in a plain
/// Bloom filter.
pub fn optimal_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize
}

pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    (((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize).max(1)
}
