//! Construction-time settings for `SeqHashMap`.

use crate::error::ConfigError;

/// Bucket table settings.
///
/// The defaults start with a single bucket and double it whenever the
/// number of pairs would exceed the bucket count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub initial_buckets: usize,
    pub max_load_factor: f32,
}

impl MapConfig {
    pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 1.0;
    /// Below this, a handful of pairs would demand an unallocatable table.
    pub const MIN_MAX_LOAD_FACTOR: f32 = 1.0e-3;

    pub const fn new() -> Self {
        Self {
            initial_buckets: 1,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    pub fn with_initial_buckets(mut self, n: usize) -> Self {
        self.initial_buckets = n;
        self
    }

    pub fn with_max_load_factor(mut self, f: f32) -> Self {
        self.max_load_factor = f;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(ConfigError::InvalidMaxLoadFactor(self.max_load_factor));
        }
        if self.max_load_factor < Self::MIN_MAX_LOAD_FACTOR {
            return Err(ConfigError::MaxLoadFactorTooSmall(self.max_load_factor));
        }
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_bucket_unit_load() {
        let c = MapConfig::default();
        assert_eq!(c.initial_buckets, 1);
        assert_eq!(c.max_load_factor, 1.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_load_factors() {
        for f in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let c = MapConfig::new().with_max_load_factor(f);
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidMaxLoadFactor(_))
            ));
        }
    }

    #[test]
    fn rejects_load_factors_below_floor() {
        for f in [1e-30, 1e-9, MapConfig::MIN_MAX_LOAD_FACTOR / 2.0] {
            let c = MapConfig::new().with_max_load_factor(f);
            assert_eq!(c.validate(), Err(ConfigError::MaxLoadFactorTooSmall(f)));
        }
        let floor = MapConfig::new().with_max_load_factor(MapConfig::MIN_MAX_LOAD_FACTOR);
        assert!(floor.validate().is_ok());
    }

    #[test]
    fn rejects_zero_buckets() {
        let c = MapConfig::new().with_initial_buckets(0);
        assert_eq!(c.validate(), Err(ConfigError::ZeroBuckets));
    }
}
