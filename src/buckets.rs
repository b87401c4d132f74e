//! Packed vector of 4-bit saturating counters.
//!
//! Counter `i` lives in word `i / 16` at bit offset `(i % 16) * 4`. Every
//! write is a mask-and-merge over a single `u64`, so the other fifteen
//! counters in the word are never touched.
use crate::error::{FilterError, Result};

/// Width of a single counter in bits.
pub const BUCKET_BITS: usize = 4;
/// Counters packed into one `u64` word.
pub const BUCKETS_PER_WORD: usize = 64 / BUCKET_BITS;
/// Saturation value of a counter.
pub const BUCKET_MAX: u8 = (1 << BUCKET_BITS) - 1;

const BUCKET_MASK: u64 = BUCKET_MAX as u64;

/// Number of `u64` words needed to hold `vector_size` counters.
pub fn words_required(vector_size: usize) -> usize {
    vector_size.div_ceil(BUCKETS_PER_WORD)
}

#[inline]
fn locate(index: usize) -> (usize, u32) {
    let word = index / BUCKETS_PER_WORD;
    let shift = ((index % BUCKETS_PER_WORD) * BUCKET_BITS) as u32;
    (word, shift)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketVector {
    vector_size: usize,
    words: Vec<u64>,
}

impl BucketVector {
    pub fn new(vector_size: usize) -> Result<Self> {
        if vector_size == 0 {
            return Err(FilterError::InvalidConfig(
                "Vector size must be > 0".into(),
            ));
        }
        Ok(Self {
            vector_size,
            words: vec![0; words_required(vector_size)],
        })
    }

    /// Logical number of counters requested at construction.
    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Addressable counters including word padding, `16 * word_count`.
    pub fn num_buckets(&self) -> usize {
        self.words.len() * BUCKETS_PER_WORD
    }

    /// Raw packed words in their canonical in-memory layout.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Result<u8> {
        self.check(index)?;
        Ok(self.get_raw(index))
    }

    /// Adds one to the counter, saturating at [`BUCKET_MAX`].
    pub fn increment(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.increment_raw(index);
        Ok(())
    }

    /// Subtracts one from the counter, flooring at zero.
    pub fn decrement(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.decrement_raw(index);
        Ok(())
    }

    pub fn set_to_max(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.set_to_max_raw(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Number of counters currently above zero.
    pub fn count_nonzero(&self) -> usize {
        self.words
            .iter()
            .map(|&word| {
                (0..BUCKETS_PER_WORD)
                    .filter(|i| (word >> (i * BUCKET_BITS)) & BUCKET_MASK != 0)
                    .count()
            })
            .sum()
    }

    /// Counter-wise maximum with `other`. Both vectors must have the same size.
    pub fn merge_max(&mut self, other: &BucketVector) -> Result<()> {
        self.merge_with(other, u8::max)
    }

    /// Counter-wise minimum with `other`. Both vectors must have the same size.
    pub fn merge_min(&mut self, other: &BucketVector) -> Result<()> {
        self.merge_with(other, u8::min)
    }

    fn merge_with(
        &mut self,
        other: &BucketVector,
        pick: impl Fn(u8, u8) -> u8,
    ) -> Result<()> {
        if self.vector_size != other.vector_size {
            return Err(FilterError::IncompatibleFilters(format!(
                "vector size {} != {}",
                self.vector_size, other.vector_size
            )));
        }
        for (word, &theirs) in self.words.iter_mut().zip(other.words.iter()) {
            let mut merged = 0u64;
            for i in 0..BUCKETS_PER_WORD {
                let shift = i * BUCKET_BITS;
                let a = ((*word >> shift) & BUCKET_MASK) as u8;
                let b = ((theirs >> shift) & BUCKET_MASK) as u8;
                merged |= (pick(a, b) as u64) << shift;
            }
            *word = merged;
        }
        Ok(())
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index >= self.num_buckets() {
            return Err(FilterError::IndexOutOfBounds {
                index,
                capacity: self.num_buckets(),
            });
        }
        Ok(())
    }

    // Raw accessors below assume `index < num_buckets()`.

    #[inline]
    pub(crate) fn get_raw(&self, index: usize) -> u8 {
        let (word, shift) = locate(index);
        ((self.words[word] >> shift) & BUCKET_MASK) as u8
    }

    #[inline]
    pub(crate) fn increment_raw(&mut self, index: usize) {
        let (word, shift) = locate(index);
        let mask = BUCKET_MASK << shift;
        let value = (self.words[word] & mask) >> shift;
        if value < BUCKET_MASK {
            self.words[word] = (self.words[word] & !mask) | ((value + 1) << shift);
        }
    }

    #[inline]
    pub(crate) fn decrement_raw(&mut self, index: usize) {
        let (word, shift) = locate(index);
        let mask = BUCKET_MASK << shift;
        let value = (self.words[word] & mask) >> shift;
        if value > 0 {
            self.words[word] = (self.words[word] & !mask) | ((value - 1) << shift);
        }
    }

    #[inline]
    pub(crate) fn set_to_max_raw(&mut self, index: usize) {
        let (word, shift) = locate(index);
        self.words[word] |= BUCKET_MASK << shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_required() {
        assert_eq!(words_required(1), 1);
        assert_eq!(words_required(16), 1);
        assert_eq!(words_required(17), 2);
        assert_eq!(words_required(32), 2);
        assert_eq!(words_required(100), 7);
    }

    #[test]
    fn test_padding_exposed_through_num_buckets() {
        let buckets = BucketVector::new(100).unwrap();
        assert_eq!(buckets.word_count(), 7);
        assert_eq!(buckets.num_buckets(), 112);
        assert_eq!(buckets.vector_size(), 100);
        // Padding counters are addressable.
        assert_eq!(buckets.get(111), Ok(0));
        assert_eq!(
            buckets.get(112),
            Err(FilterError::IndexOutOfBounds {
                index: 112,
                capacity: 112
            })
        );
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            BucketVector::new(0),
            Err(FilterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_increment_saturates() {
        let mut buckets = BucketVector::new(32).unwrap();
        for _ in 0..40 {
            buckets.increment(5).unwrap();
        }
        assert_eq!(buckets.get(5).unwrap(), BUCKET_MAX);
        assert_eq!(buckets.get(4).unwrap(), 0);
        assert_eq!(buckets.get(6).unwrap(), 0);
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut buckets = BucketVector::new(32).unwrap();
        buckets.increment(3).unwrap();
        buckets.decrement(3).unwrap();
        buckets.decrement(3).unwrap();
        assert_eq!(buckets.get(3).unwrap(), 0);
        assert_eq!(buckets.as_words(), &[0, 0]);
    }

    #[test]
    fn test_neighbours_untouched_at_word_edges() {
        let mut buckets = BucketVector::new(48).unwrap();
        // Fill the neighbours of the word boundary with distinct values.
        for _ in 0..7 {
            buckets.increment(14).unwrap();
        }
        for _ in 0..9 {
            buckets.increment(16).unwrap();
        }
        for _ in 0..20 {
            buckets.increment(15).unwrap();
        }
        buckets.decrement(15).unwrap();
        assert_eq!(buckets.get(14).unwrap(), 7);
        assert_eq!(buckets.get(15).unwrap(), 14);
        assert_eq!(buckets.get(16).unwrap(), 9);

        buckets.set_to_max(15).unwrap();
        assert_eq!(buckets.get(15).unwrap(), BUCKET_MAX);
        assert_eq!(buckets.as_words()[0] >> 60, 0xF);
        assert_eq!(buckets.as_words()[1] & 0xF, 9);
    }

    #[test]
    fn test_packing_layout() {
        let mut buckets = BucketVector::new(16).unwrap();
        buckets.increment(0).unwrap();
        buckets.increment(1).unwrap();
        buckets.increment(1).unwrap();
        buckets.set_to_max(3).unwrap();
        assert_eq!(buckets.as_words(), &[0xF021]);
    }

    #[test]
    fn test_count_nonzero_and_clear() {
        let mut buckets = BucketVector::new(40).unwrap();
        for i in [0, 15, 16, 39] {
            buckets.increment(i).unwrap();
        }
        assert_eq!(buckets.count_nonzero(), 4);
        buckets.clear();
        assert_eq!(buckets.count_nonzero(), 0);
    }

    #[test]
    fn test_merge_max_and_min() {
        let mut a = BucketVector::new(20).unwrap();
        let mut b = BucketVector::new(20).unwrap();
        a.set_to_max(1).unwrap();
        a.increment(18).unwrap();
        b.increment(1).unwrap();
        b.increment(2).unwrap();
        b.increment(18).unwrap();
        b.increment(18).unwrap();

        let mut max = a.clone();
        max.merge_max(&b).unwrap();
        assert_eq!(max.get(1).unwrap(), 15);
        assert_eq!(max.get(2).unwrap(), 1);
        assert_eq!(max.get(18).unwrap(), 2);

        let mut min = a.clone();
        min.merge_min(&b).unwrap();
        assert_eq!(min.get(1).unwrap(), 1);
        assert_eq!(min.get(2).unwrap(), 0);
        assert_eq!(min.get(18).unwrap(), 1);

        let other = BucketVector::new(21).unwrap();
        assert!(matches!(
            a.merge_max(&other),
            Err(FilterError::IncompatibleFilters(_))
        ));
    }
}
