//! Standard Bloom filter, one bit per position
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::hash::HashScheme;
use crate::traits::{FilterStats, MembershipFilter};
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilter {
    config: FilterConfig,
    bits: BitVec<usize, Lsb0>,
}

impl BloomFilter {
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let bits = bitvec![usize, Lsb0; 0; config.vector_size];
        debug!(
            vector_size = config.vector_size,
            num_hashes = config.num_hashes,
            "created bloom filter"
        );
        Ok(Self { config, bits })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    fn positions(&self, key: &[u8]) -> Result<Vec<usize>> {
        self.config.hash_scheme.positions(
            key,
            self.config.num_hashes,
            self.config.vector_size,
        )
    }

    fn ensure_compatible(&self, other: &BloomFilter) -> Result<()> {
        if self.config != other.config {
            return Err(FilterError::IncompatibleFilters(format!(
                "{:?} != {:?}",
                self.config, other.config
            )));
        }
        Ok(())
    }

    pub fn union(&mut self, other: &BloomFilter) -> Result<()> {
        self.ensure_compatible(other)?;
        self.bits |= other.bits.as_bitslice();
        Ok(())
    }

    pub fn intersect(&mut self, other: &BloomFilter) -> Result<()> {
        self.ensure_compatible(other)?;
        self.bits &= other.bits.as_bitslice();
        Ok(())
    }

    pub fn xor(&mut self, other: &BloomFilter) -> Result<()> {
        self.ensure_compatible(other)?;
        self.bits ^= other.bits.as_bitslice();
        Ok(())
    }

    /// Inverts every bit.
    pub fn not(&mut self) {
        let bits = std::mem::take(&mut self.bits);
        self.bits = !bits;
    }
}

impl MembershipFilter for BloomFilter {
    fn add(&mut self, key: &[u8]) -> Result<()> {
        for idx in self.positions(key)? {
            if idx >= self.config.vector_size {
                return Err(FilterError::IndexOutOfBounds {
                    index: idx,
                    capacity: self.config.vector_size,
                });
            }
            self.bits.set(idx, true);
        }
        Ok(())
    }

    fn membership_test(&self, key: &[u8]) -> Result<bool> {
        for idx in self.positions(key)? {
            match self.bits.get(idx) {
                Some(bit) if *bit => {}
                Some(_) => return Ok(false),
                None => {
                    return Err(FilterError::IndexOutOfBounds {
                        index: idx,
                        capacity: self.config.vector_size,
                    });
                }
            }
        }
        Ok(true)
    }

    fn clear(&mut self) {
        self.bits.fill(false);
    }
}

impl FilterStats for BloomFilter {
    fn vector_size(&self) -> usize {
        self.config.vector_size
    }

    fn num_hashes(&self) -> usize {
        self.config.num_hashes
    }

    fn hash_scheme(&self) -> HashScheme {
        self.config.hash_scheme
    }

    fn occupancy(&self) -> f64 {
        self.bits.count_ones() as f64 / self.config.vector_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfigBuilder;

    fn create_filter() -> BloomFilter {
        let config = FilterConfigBuilder::default()
            .vector_size(1024)
            .num_hashes(3)
            .hash_scheme(HashScheme::DoubleHashing)
            .build()
            .expect("Unable to build FilterConfig");
        BloomFilter::new(config).expect("Failed to create BloomFilter")
    }

    #[test]
    fn test_add_and_test() {
        let mut filter = create_filter();
        filter.add(b"some data").unwrap();
        filter.add(b"another data").unwrap();
        assert!(filter.membership_test(b"some data").unwrap());
        assert!(filter.membership_test(b"another data").unwrap());
        filter.clear();
        assert!(!filter.membership_test(b"some data").unwrap());
    }

    #[test]
    fn test_set_operations() {
        let mut a = create_filter();
        let mut b = create_filter();
        a.add(b"left").unwrap();
        b.add(b"right").unwrap();

        let mut union = a.clone();
        union.union(&b).unwrap();
        assert!(union.membership_test(b"left").unwrap());
        assert!(union.membership_test(b"right").unwrap());

        let mut same = a.clone();
        same.xor(&a).unwrap();
        assert_eq!(same.occupancy(), 0.0);

        let mut intersection = a.clone();
        intersection.intersect(&a).unwrap();
        assert_eq!(intersection, a);
    }

    #[test]
    fn test_not_inverts_every_bit() {
        let mut filter = create_filter();
        filter.add(b"item").unwrap();
        let before = filter.occupancy();
        filter.not();
        assert!((filter.occupancy() - (1.0 - before)).abs() < 1e-12);
        filter.not();
        assert!(filter.membership_test(b"item").unwrap());
    }
}
