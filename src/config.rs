use crate::error::{FilterError, Result};
use crate::hash::{
    HashScheme, MAX_VECTOR_SIZE, optimal_num_hashes, optimal_vector_size,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration shared by every filter in the crate.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Number of logical positions (bits or counters)
    #[builder(default = "1 << 20")]
    pub vector_size: usize,

    /// Hash functions applied per operation
    #[builder(default = "4")]
    pub num_hashes: usize,

    /// Hash family used to map keys onto positions
    #[builder(default)]
    pub hash_scheme: HashScheme,
}

impl FilterConfig {
    /// Derives `vector_size` and `num_hashes` for `capacity` elements at the
    /// target false positive rate.
    pub fn for_capacity(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(FilterError::InvalidConfig(
                "Capacity must be > 0".into(),
            ));
        }
        if false_positive_rate <= 0.0 || false_positive_rate >= 1.0 {
            return Err(FilterError::InvalidConfig(
                "FPR must be between 0 and 1".into(),
            ));
        }
        let vector_size = optimal_vector_size(capacity, false_positive_rate);
        let config = Self {
            vector_size,
            num_hashes: optimal_num_hashes(capacity, vector_size),
            hash_scheme: HashScheme::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vector_size == 0 {
            return Err(FilterError::InvalidConfig(
                "Vector size must be > 0".into(),
            ));
        }
        if self.vector_size > MAX_VECTOR_SIZE {
            return Err(FilterError::InvalidConfig(format!(
                "Vector size must be <= {MAX_VECTOR_SIZE}"
            )));
        }
        if self.num_hashes == 0 {
            return Err(FilterError::InvalidConfig(
                "Number of hashes must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Range swept by the stable filter's aging step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgingSpan {
    /// Every counter in the packed words, padding included.
    #[default]
    Padded,
    /// Only the `vector_size` counters the hash family can address.
    Logical,
}

#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct StableFilterConfig {
    #[builder(default = "1 << 20")]
    pub vector_size: usize,

    #[builder(default = "4")]
    pub num_hashes: usize,

    #[builder(default)]
    pub hash_scheme: HashScheme,

    /// Seed for the aging random source; drawn from the OS when unset
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,

    /// Counters aged per insertion; `2 * num_hashes` when unset
    #[builder(default, setter(strip_option))]
    pub decrements_per_insert: Option<usize>,

    #[builder(default)]
    pub aging_span: AgingSpan,
}

impl StableFilterConfig {
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            vector_size: self.vector_size,
            num_hashes: self.num_hashes,
            hash_scheme: self.hash_scheme,
        }
    }

    pub fn decrements(&self) -> usize {
        self.decrements_per_insert.unwrap_or(2 * self.num_hashes)
    }

    pub fn validate(&self) -> Result<()> {
        self.filter_config().validate()?;
        if self.decrements_per_insert == Some(0) {
            return Err(FilterError::InvalidConfig(
                "Decrements per insert must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = FilterConfigBuilder::default().build().unwrap();
        assert_eq!(config.vector_size, 1 << 20);
        assert_eq!(config.num_hashes, 4);
        assert_eq!(config.hash_scheme, HashScheme::Murmur3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stable_defaults_derive_decrements() {
        let config = StableFilterConfigBuilder::default()
            .num_hashes(3)
            .build()
            .unwrap();
        assert_eq!(config.decrements(), 6);
        assert_eq!(config.seed, None);
        assert_eq!(config.aging_span, AgingSpan::Padded);

        let config = StableFilterConfigBuilder::default()
            .decrements_per_insert(10)
            .build()
            .unwrap();
        assert_eq!(config.decrements(), 10);
    }

    #[test]
    fn test_for_capacity() {
        let config = FilterConfig::for_capacity(1000, 0.01).unwrap();
        assert_eq!(config.vector_size, 9586);
        assert_eq!(config.num_hashes, 7);
        assert!(FilterConfig::for_capacity(0, 0.01).is_err());
        assert!(FilterConfig::for_capacity(1000, 1.0).is_err());
    }
}
