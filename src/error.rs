//! Error types.

use thiserror::Error;

/// Returned by [`SeqHashMap::at`](crate::SeqHashMap::at) when the key is absent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
#[error("key not found")]
pub struct KeyNotFound;

/// Rejected [`MapConfig`](crate::MapConfig) settings.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("max load factor must be finite and positive, got {0}")]
    InvalidMaxLoadFactor(f32),
    #[error("max load factor {0} is below the minimum of {min}", min = crate::MapConfig::MIN_MAX_LOAD_FACTOR)]
    MaxLoadFactorTooSmall(f32),
    #[error("initial bucket count must be at least 1")]
    ZeroBuckets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(KeyNotFound.to_string(), "key not found");
        assert_eq!(
            ConfigError::InvalidMaxLoadFactor(-1.0).to_string(),
            "max load factor must be finite and positive, got -1"
        );
        assert_eq!(
            ConfigError::MaxLoadFactorTooSmall(0.0005).to_string(),
            "max load factor 0.0005 is below the minimum of 0.001"
        );
        assert_eq!(
            ConfigError::ZeroBuckets.to_string(),
            "initial bucket count must be at least 1"
        );
    }
}
