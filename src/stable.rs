//! Stable Bloom filter: a counting filter that forgets.
//!
//! Every insertion first ages the structure by decrementing a contiguous run
//! of `p` counters that starts at a fresh random position and walks backward
//! (wrapping at zero), then forces the key's own counters to the maximum.
//! Old entries fade out at a rate independent of the key distribution, so
//! occupancy stays bounded over an unbounded stream and no `delete` exists.
//!
//! See Deng & Rafiei, "Approximately Detecting Duplicates for Streaming
//! Data using Stable Bloom Filters" (SIGMOD 2006).
use crate::buckets::{BUCKETS_PER_WORD, BucketVector, words_required};
use crate::config::{AgingSpan, StableFilterConfig};
use crate::counting::{CountingFilter, InsertPolicy};
use crate::error::{FilterError, Result};
use crate::hash::HashScheme;
use crate::traits::{FilterStats, MembershipFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Aging-then-set-max insertion policy. Built only by [`StableFilter`],
/// which guarantees `span <= num_buckets`.
pub(crate) struct Aging<R = StdRng> {
    rng: R,
    decrements: usize,
    span: usize,
}

impl<R: Rng> InsertPolicy for Aging<R> {
    fn commit(
        &mut self,
        buckets: &mut BucketVector,
        positions: &[usize],
    ) -> Result<()> {
        let mut n = self.rng.random_range(0..self.span);
        trace!(start = n, decrements = self.decrements, "aging sweep");
        for _ in 0..self.decrements {
            buckets.decrement_raw(n);
            n = if n == 0 { self.span - 1 } else { n - 1 };
        }

        // Targets go to max after the sweep: a just-added key always tests present.
        for &position in positions {
            buckets.set_to_max(position)?;
        }
        Ok(())
    }
}

/// Counting filter with aging insertion and no delete.
///
/// ```
/// use stable_bloom_rs::{
///     MembershipFilter, StableFilter, StableFilterConfigBuilder,
/// };
///
/// let config = StableFilterConfigBuilder::default()
///     .vector_size(1024)
///     .num_hashes(3)
///     .seed(7)
///     .build()
///     .unwrap();
/// let mut filter = StableFilter::new(config).unwrap();
/// filter.add(b"seen").unwrap();
/// assert!(filter.membership_test(b"seen").unwrap());
/// ```
///
/// Removal only happens through aging:
///
/// ```compile_fail
/// use stable_bloom_rs::{
///     DeletableFilter, StableFilter, StableFilterConfigBuilder,
/// };
///
/// let config = StableFilterConfigBuilder::default().seed(7).build().unwrap();
/// let mut filter = StableFilter::new(config).unwrap();
/// filter.delete(b"seen").unwrap();
/// ```
///
/// The aging policy is internal; it cannot be attached to another
/// counting filter:
///
/// ```compile_fail
/// use stable_bloom_rs::stable::Aging;
/// ```
pub struct StableFilter<R = StdRng> {
    inner: CountingFilter<Aging<R>>,
    config: StableFilterConfig,
}

pub type StableBloomFilter = StableFilter<StdRng>;

impl StableFilter<StdRng> {
    /// Creates a filter whose random source is seeded from `config.seed`,
    /// or from the operating system when no seed is given.
    pub fn new(config: StableFilterConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        debug!(seeded = config.seed.is_some(), "stable filter random source");
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> StableFilter<R> {
    /// Creates a filter that ages with the supplied random source.
    /// `config.seed` is ignored.
    pub fn with_rng(config: StableFilterConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let filter_config = config.filter_config();
        let span = match config.aging_span {
            AgingSpan::Padded => {
                words_required(config.vector_size) * BUCKETS_PER_WORD
            }
            AgingSpan::Logical => config.vector_size,
        };
        let policy = Aging {
            rng,
            decrements: config.decrements(),
            span,
        };
        let inner = CountingFilter::with_policy(filter_config, policy)?;
        debug!(
            num_buckets = inner.buckets().num_buckets(),
            aging_span = span,
            decrements_per_insert = config.decrements(),
            "created stable filter"
        );
        Ok(Self { inner, config })
    }

    pub fn config(&self) -> &StableFilterConfig {
        &self.config
    }

    pub fn buckets(&self) -> &BucketVector {
        self.inner.buckets()
    }

    /// Addressable counters including word padding.
    pub fn num_buckets(&self) -> usize {
        self.inner.buckets().num_buckets()
    }

    /// Counters aged on every insertion (`p`).
    pub fn decrements_per_insert(&self) -> usize {
        self.inner.policy().decrements
    }

    /// Length of the range the aging sweep walks over.
    pub fn aging_span(&self) -> usize {
        self.inner.policy().span
    }

    pub fn approximate_count(&self, key: &[u8]) -> Result<u8> {
        self.inner.approximate_count(key)
    }

    /// Counter-wise maximum with a filter of identical configuration,
    /// aging parameters included. Seeds may differ; the random source of
    /// `self` is kept.
    pub fn union(&mut self, other: &StableFilter<R>) -> Result<()> {
        let mut theirs = other.config.clone();
        theirs.seed = self.config.seed;
        if theirs != self.config {
            return Err(FilterError::IncompatibleFilters(format!(
                "{:?} vs {:?}",
                self.config, other.config
            )));
        }
        self.inner.union(&other.inner)
    }
}

impl<R: Rng> MembershipFilter for StableFilter<R> {
    fn add(&mut self, key: &[u8]) -> Result<()> {
        self.inner.add(key)
    }

    fn membership_test(&self, key: &[u8]) -> Result<bool> {
        self.inner.membership_test(key)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<R> FilterStats for StableFilter<R> {
    fn vector_size(&self) -> usize {
        self.inner.vector_size()
    }

    fn num_hashes(&self) -> usize {
        self.inner.num_hashes()
    }

    fn hash_scheme(&self) -> HashScheme {
        self.inner.hash_scheme()
    }

    fn occupancy(&self) -> f64 {
        self.inner.occupancy()
    }
}

impl<R> std::fmt::Debug for StableFilter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StableFilter {{ vector_size: {}, num_hashes: {}, decrements_per_insert: {}, aging_span: {:?} }}",
            self.config.vector_size,
            self.config.num_hashes,
            self.config.decrements(),
            self.config.aging_span
        )
    }
}
