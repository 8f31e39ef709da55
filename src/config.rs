//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

const TRIM_INTERVAL_VAR: &str = "CACHE_TRIM_INTERVAL";
const DEFAULT_TTL_VAR: &str = "CACHE_DEFAULT_TTL";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Background trim interval in seconds (0 disables trimming)
    pub trim_interval: f64,
    /// TTL in seconds used by callers that have no TTL of their own
    pub default_ttl: f64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_TRIM_INTERVAL` - Trim interval in seconds (default: 0)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            trim_interval: env::var(TRIM_INTERVAL_VAR)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.trim_interval),
            default_ttl: env::var(DEFAULT_TTL_VAR)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
        }
    }

    /// Like [`Config::from_env`], but reports values that fail to parse.
    pub fn try_from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            trim_interval: parse_var(TRIM_INTERVAL_VAR)?.unwrap_or(defaults.trim_interval),
            default_ttl: parse_var(DEFAULT_TTL_VAR)?.unwrap_or(defaults.default_ttl),
        })
    }
}

fn parse_var(var: &'static str) -> Result<Option<f64>> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig { var, value }),
        Err(_) => Ok(None),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trim_interval: 0.0,
            default_ttl: 300.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.trim_interval, 0.0);
        assert_eq!(config.default_ttl, 300.0);
    }

    // Env vars are process-wide, so every env scenario lives in one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var(TRIM_INTERVAL_VAR);
        env::remove_var(DEFAULT_TTL_VAR);
        assert_eq!(Config::from_env(), Config::default());
        assert_eq!(Config::try_from_env().unwrap(), Config::default());

        env::set_var(TRIM_INTERVAL_VAR, "0.5");
        env::set_var(DEFAULT_TTL_VAR, " 60 ");
        let config = Config::try_from_env().unwrap();
        assert_eq!(config.trim_interval, 0.5);
        assert_eq!(config.default_ttl, 60.0);

        env::set_var(DEFAULT_TTL_VAR, "forever");
        let err = Config::try_from_env().unwrap_err();
        assert!(matches!(
            err,
            CacheError::InvalidConfig { var: DEFAULT_TTL_VAR, .. }
        ));
        // The lenient loader falls back instead
        assert_eq!(Config::from_env().default_ttl, 300.0);

        env::remove_var(TRIM_INTERVAL_VAR);
        env::remove_var(DEFAULT_TTL_VAR);
    }
}
