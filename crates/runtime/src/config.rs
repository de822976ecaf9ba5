//! Session configuration.

use std::env;

use anyhow::{ensure, Result};

use crate::types::{FRAME_MS, KEY_REPEAT_DELAY_MS, KEY_REPEAT_INTERVAL_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Piece generator seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub frame_ms: u64,
    pub repeat_delay_ms: u64,
    pub repeat_interval_ms: u64,
    /// Release keys not re-reported within this window (for terminals
    /// without key-release events)
    pub key_release_timeout_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_ms: FRAME_MS,
            repeat_delay_ms: KEY_REPEAT_DELAY_MS,
            repeat_interval_ms: KEY_REPEAT_INTERVAL_MS,
            key_release_timeout_ms: None,
        }
    }
}

impl SessionConfig {
    /// Create from `BLOCKFALL_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create from an arbitrary variable source. Unparseable values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |name: &str| lookup(name).and_then(|s| s.trim().parse::<u64>().ok());
        let defaults = Self::default();

        Self {
            seed: number("BLOCKFALL_SEED"),
            frame_ms: number("BLOCKFALL_FRAME_MS")
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.frame_ms),
            repeat_delay_ms: number("BLOCKFALL_REPEAT_DELAY_MS").unwrap_or(defaults.repeat_delay_ms),
            repeat_interval_ms: number("BLOCKFALL_REPEAT_INTERVAL_MS")
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.repeat_interval_ms),
            key_release_timeout_ms: number("BLOCKFALL_KEY_RELEASE_TIMEOUT_MS").filter(|&ms| ms > 0),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.frame_ms > 0, "frame interval must be positive");
        ensure!(self.repeat_interval_ms > 0, "repeat interval must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SessionConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.repeat_delay_ms, 150);
        assert_eq!(config.repeat_interval_ms, 50);
    }

    #[test]
    fn test_overrides() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("BLOCKFALL_SEED", "42"),
            ("BLOCKFALL_FRAME_MS", " 8 "),
            ("BLOCKFALL_REPEAT_DELAY_MS", "200"),
            ("BLOCKFALL_REPEAT_INTERVAL_MS", "40"),
            ("BLOCKFALL_KEY_RELEASE_TIMEOUT_MS", "120"),
        ]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.frame_ms, 8);
        assert_eq!(config.repeat_delay_ms, 200);
        assert_eq!(config.repeat_interval_ms, 40);
        assert_eq!(config.key_release_timeout_ms, Some(120));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("BLOCKFALL_SEED", "abc"),
            ("BLOCKFALL_FRAME_MS", "0"),
            ("BLOCKFALL_KEY_RELEASE_TIMEOUT_MS", "0"),
        ]));
        assert_eq!(config.seed, None);
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.key_release_timeout_ms, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_frame() {
        let config = SessionConfig {
            frame_ms: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = SessionConfig::from_env();
    }
}
