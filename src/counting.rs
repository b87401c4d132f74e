use crate::buckets::{BUCKET_MAX, BucketVector};
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::hash::HashScheme;
use crate::traits::{DeletableFilter, FilterStats, MembershipFilter};
use tracing::debug;

/// Decides how an insertion updates the counters at a key's positions.
///
/// Position computation is shared by every counting filter; only this
/// commit step differs between the plain and the stable variants.
pub trait InsertPolicy {
    fn commit(
        &mut self,
        buckets: &mut BucketVector,
        positions: &[usize],
    ) -> Result<()>;
}

/// Plain counting behaviour: each target counter goes up by one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Increment;

impl InsertPolicy for Increment {
    fn commit(
        &mut self,
        buckets: &mut BucketVector,
        positions: &[usize],
    ) -> Result<()> {
        for &position in positions {
            buckets.increment(position)?;
        }
        Ok(())
    }
}

/// Counting Bloom filter over packed 4-bit counters.
///
/// With the default [`Increment`] policy this is the classic counting
/// filter supporting [`DeletableFilter::delete`].
#[derive(Clone)]
pub struct CountingFilter<P = Increment> {
    config: FilterConfig,
    buckets: BucketVector,
    policy: P,
}

pub type CountingBloomFilter = CountingFilter<Increment>;

impl CountingFilter<Increment> {
    pub fn new(config: FilterConfig) -> Result<Self> {
        Self::with_policy(config, Increment)
    }
}

impl<P: InsertPolicy> CountingFilter<P> {
    pub fn with_policy(config: FilterConfig, policy: P) -> Result<Self> {
        config.validate()?;
        let buckets = BucketVector::new(config.vector_size)?;
        debug!(
            vector_size = config.vector_size,
            num_hashes = config.num_hashes,
            words = buckets.word_count(),
            "created counting filter"
        );
        Ok(Self {
            config,
            buckets,
            policy,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn buckets(&self) -> &BucketVector {
        &self.buckets
    }

    pub(crate) fn policy(&self) -> &P {
        &self.policy
    }

    fn positions(&self, key: &[u8]) -> Result<Vec<usize>> {
        self.config.hash_scheme.positions(
            key,
            self.config.num_hashes,
            self.config.vector_size,
        )
    }

    /// Smallest counter among the key's positions, an upper bound on how
    /// many times the key was added (saturating at 15).
    pub fn approximate_count(&self, key: &[u8]) -> Result<u8> {
        let mut count = BUCKET_MAX;
        for position in self.positions(key)? {
            count = count.min(self.buckets.get(position)?);
        }
        Ok(count)
    }

    /// Counter-wise maximum with a filter of identical configuration.
    pub fn union(&mut self, other: &CountingFilter<P>) -> Result<()> {
        self.ensure_compatible(&other.config)?;
        self.buckets.merge_max(&other.buckets)?;
        debug!("merged counting filter (union)");
        Ok(())
    }

    /// Counter-wise minimum with a filter of identical configuration.
    pub fn intersect(&mut self, other: &CountingFilter<P>) -> Result<()> {
        self.ensure_compatible(&other.config)?;
        self.buckets.merge_min(&other.buckets)?;
        debug!("merged counting filter (intersection)");
        Ok(())
    }

    fn ensure_compatible(&self, other: &FilterConfig) -> Result<()> {
        if &self.config != other {
            return Err(FilterError::IncompatibleFilters(format!(
                "{:?} != {:?}",
                self.config, other
            )));
        }
        Ok(())
    }
}

impl<P: InsertPolicy> MembershipFilter for CountingFilter<P> {
    fn add(&mut self, key: &[u8]) -> Result<()> {
        let positions = self.positions(key)?;
        self.policy.commit(&mut self.buckets, &positions)
    }

    fn membership_test(&self, key: &[u8]) -> Result<bool> {
        for position in self.positions(key)? {
            if self.buckets.get(position)? == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn clear(&mut self) {
        self.buckets.clear();
        debug!("cleared counting filter");
    }
}

impl DeletableFilter for CountingFilter<Increment> {
    /// Decrements the key's counters. Removing a key that was never added
    /// is not detected and only degrades accuracy.
    fn delete(&mut self, key: &[u8]) -> Result<()> {
        for position in self.positions(key)? {
            self.buckets.decrement(position)?;
        }
        Ok(())
    }
}

impl<P> FilterStats for CountingFilter<P> {
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
        self.buckets.count_nonzero() as f64 / self.config.vector_size as f64
    }
}

impl<P> std::fmt::Debug for CountingFilter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CountingFilter {{ vector_size: {}, num_hashes: {}, hash_scheme: {:?}, words: {} }}",
            self.config.vector_size,
            self.config.num_hashes,
            self.config.hash_scheme,
            self.buckets.word_count()
        )
    }
}
