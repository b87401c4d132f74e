use stable_bloom_rs::{
    CountingBloomFilter, CountingFilter, FilterConfigBuilder, HashScheme,
    StableBloomFilter, StableFilter, StableFilterConfigBuilder,
};

/// Counting filter with the given size and number of hashes
#[allow(dead_code)]
pub fn create_counting_filter(
    vector_size: usize,
    num_hashes: usize,
) -> CountingBloomFilter {
    let config = FilterConfigBuilder::default()
        .vector_size(vector_size)
        .num_hashes(num_hashes)
        .hash_scheme(HashScheme::Murmur3)
        .build()
        .expect("Failed to build test config");
    CountingFilter::new(config).expect("Failed to create test filter")
}

/// Stable filter with a fixed seed so runs are reproducible
#[allow(dead_code)]
pub fn create_stable_filter(
    vector_size: usize,
    num_hashes: usize,
    seed: u64,
) -> StableBloomFilter {
    let config = StableFilterConfigBuilder::default()
        .vector_size(vector_size)
        .num_hashes(num_hashes)
        .seed(seed)
        .build()
        .expect("Failed to build test config");
    StableFilter::new(config).expect("Failed to create test filter")
}

/// Consistent test keys: `prefix-000000`, `prefix-000001`, ...
#[allow(dead_code)]
pub fn generate_test_keys(prefix: &str, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("{prefix}-{i:06}").into_bytes())
        .collect()
}
