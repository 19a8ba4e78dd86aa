//! Session configuration.
//!
//! Every key is optional; an empty document yields the defaults
//! (count 0, interval 3s, bounds 1s to 10s).
//!
//! ```toml
//! initial_count = 0
//! initial_interval_secs = 3
//! min_interval_secs = 1
//! max_interval_secs = 10
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial values and interval bounds for a counter session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    pub initial_count: i64,
    pub initial_interval_secs: u32,
    pub min_interval_secs: u32,
    pub max_interval_secs: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            initial_count: 0,
            initial_interval_secs: 3,
            min_interval_secs: 1,
            max_interval_secs: 10,
        }
    }
}

impl CounterConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check that the interval bounds are usable and contain the initial interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_interval_secs, self.max_interval_secs);
        if min == 0 {
            return Err(ConfigError::ZeroMinInterval);
        }
        if min > max {
            return Err(ConfigError::InvertedBounds { min, max });
        }
        if !(min..=max).contains(&self.initial_interval_secs) {
            return Err(ConfigError::InitialIntervalOutOfRange {
                initial: self.initial_interval_secs,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = CounterConfig::from_toml_str("").unwrap();
        assert_eq!(config, CounterConfig::default());
        assert_eq!(config.initial_interval_secs, 3);
        assert_eq!((config.min_interval_secs, config.max_interval_secs), (1, 10));
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = CounterConfig::from_toml_str("initial_count = -4\nmax_interval_secs = 30").unwrap();
        assert_eq!(config.initial_count, -4);
        assert_eq!(config.max_interval_secs, 30);
        assert_eq!(config.initial_interval_secs, 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CounterConfig::from_toml_str("step = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_minimum_is_rejected() {
        let err = CounterConfig::from_toml_str("min_interval_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMinInterval));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = CounterConfig::from_toml_str("min_interval_secs = 5\nmax_interval_secs = 4").unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { min: 5, max: 4 }));
    }

    #[test]
    fn initial_interval_must_sit_inside_bounds() {
        let err = CounterConfig::from_toml_str("initial_interval_secs = 11").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InitialIntervalOutOfRange { initial: 11, min: 1, max: 10 }
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CounterConfig::load("/definitely/not/here/counter.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("counter.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
