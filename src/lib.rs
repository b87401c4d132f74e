//! Counting and stable Bloom filters over packed 4-bit counters.
//!
//! The crate provides three fixed-memory set-membership filters:
//!
//! Bloom filter:
//!   * One bit per position, `add` and `membership_test` only.
//! Counting filter:
//!   * Each position is a 4-bit saturating counter (0..=15), sixteen packed
//!     per `u64` word.
//!   * `add` increments the key's counters, `delete` decrements them,
//!     `membership_test` reports true when none of them is zero.
//! Stable filter:
//!   * A counting filter whose insertion first decrements `p` consecutive
//!     counters from a random start, then forces the key's counters to 15.
//!   * Old entries fade out without `delete`, keeping memory and error
//!     rates bounded over an unbounded stream.
//!
//! Known trade-offs:
//!   * False positives are expected; their rate depends on
//!     `(vector_size, num_hashes, p)`.
//!   * The stable filter can produce false negatives for keys that have
//!     aged out.
//!   * Nothing here is synchronized; share behind a lock or shard.
//!   * Hashes are 32-bit, so `vector_size` is limited to `u32::MAX`.

pub mod bloom;
pub mod buckets;
pub mod config;
pub mod counting;
mod error;
mod hash;
pub mod stable;
pub mod traits;

pub use bloom::BloomFilter;
pub use buckets::{BucketVector, words_required};
pub use config::{
    AgingSpan, FilterConfig, FilterConfigBuilder, FilterConfigBuilderError,
    StableFilterConfig, StableFilterConfigBuilder,
    StableFilterConfigBuilderError,
};
pub use counting::{CountingBloomFilter, CountingFilter, Increment, InsertPolicy};
pub use error::{FilterError, Result};
pub use hash::{
    HashScheme, MAX_VECTOR_SIZE, optimal_num_hashes, optimal_vector_size,
};
pub use stable::{StableBloomFilter, StableFilter};
pub use traits::{BulkFilterOps, DeletableFilter, FilterStats, MembershipFilter};
