//! Engine configuration from the environment.

use std::num::ParseIntError;

pub const DEFAULT_DB_PATH: &str = "skirmish.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SKIRMISH_RNG_SEED must be an unsigned integer, got '{value}': {source}")]
    InvalidSeed {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// SQLite file holding resolutions, analytics and initiative rules.
    pub db_path: String,
    /// Seed for reproducible jitter and dice; system randomness when unset.
    pub rng_seed: Option<u64>,
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            rng_seed: None,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rng_seed = non_empty("SKIRMISH_RNG_SEED")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidSeed { value, source })
            })
            .transpose()?;

        Ok(Self {
            db_path: non_empty("SKIRMISH_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            rng_seed,
            log_filter: non_empty("RUST_LOG"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("SKIRMISH_DB_PATH", "/var/lib/skirmish/combat.db"),
            ("SKIRMISH_RNG_SEED", " 1234 "),
            ("RUST_LOG", "skirmish_engine=trace"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/var/lib/skirmish/combat.db");
        assert_eq!(config.rng_seed, Some(1234));
        assert_eq!(config.log_filter.as_deref(), Some("skirmish_engine=trace"));
    }

    #[test]
    fn blank_values_fall_back() {
        let blank = lookup(&[("SKIRMISH_DB_PATH", ""), ("SKIRMISH_RNG_SEED", "  ")]);
        let config = EngineConfig::from_lookup(blank).unwrap();
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn rejects_bad_seed() {
        let err = EngineConfig::from_lookup(lookup(&[("SKIRMISH_RNG_SEED", "-3")])).unwrap_err();
        assert!(err.to_string().contains("'-3'"));
    }
}
