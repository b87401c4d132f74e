use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Key must not be empty")]
    EmptyKey,

    #[error("Index out of bounds: {index} >= {capacity}")]
    IndexOutOfBounds { index: usize, capacity: usize },

    #[error("Incompatible filters: {0}")]
    IncompatibleFilters(String),

    /// I/O failure reported by the murmur3 reader. Keys are read from an
    /// in-memory slice, so this cannot occur in practice.
    #[error("Hash error: {0}")]
    Hash(String),
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::Hash(err.to_string())
    }
}
