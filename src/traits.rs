use crate::error::Result;
use crate::hash::HashScheme;

/// Core operations shared by every filter
pub trait MembershipFilter {
    /// Records `key` in the filter
    fn add(&mut self, key: &[u8]) -> Result<()>;

    /// Returns true when `key` has probably been added
    fn membership_test(&self, key: &[u8]) -> Result<bool>;

    /// Resets the filter to its empty state
    fn clear(&mut self);
}

/// Filters supporting explicit removal
pub trait DeletableFilter: MembershipFilter {
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}

pub trait BulkFilterOps {
    fn add_all(&mut self, keys: &[&[u8]]) -> Result<()>;
    fn membership_test_all(&self, keys: &[&[u8]]) -> Result<Vec<bool>>;
}

impl<F: MembershipFilter> BulkFilterOps for F {
    fn add_all(&mut self, keys: &[&[u8]]) -> Result<()> {
        for key in keys {
            self.add(key)?;
        }
        Ok(())
    }

    fn membership_test_all(&self, keys: &[&[u8]]) -> Result<Vec<bool>> {
        keys.iter().map(|key| self.membership_test(key)).collect()
    }
}

pub trait FilterStats {
    fn vector_size(&self) -> usize;
    fn num_hashes(&self) -> usize;
    fn hash_scheme(&self) -> HashScheme;
    /// Fraction of positions currently set or nonzero
    fn occupancy(&self) -> f64;
}
