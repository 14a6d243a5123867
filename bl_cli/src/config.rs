//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use belote_lobby::allocation::{TableAllocator, TableNumber};
use std::{collections::BTreeSet, path::PathBuf};

/// Values given on the command line; each one beats its environment variable
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub players_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub occupied: Option<String>,
    pub pretty: bool,
}

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Roster file; `None` reads stdin
    pub players_file: Option<PathBuf>,
    /// Shuffle seed for reproducible runs
    pub seed: Option<u64>,
    /// Shuffle the roster before seating
    pub shuffle: bool,
    /// Table numbers already in use
    pub occupied: BTreeSet<TableNumber>,
    /// Pretty-print the JSON output
    pub pretty: bool,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`CliConfig::from_env`] with a custom variable source
    pub fn from_lookup(
        overrides: CliOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let players_file = overrides
            .players_file
            .or_else(|| lookup("BL_PLAYERS_FILE").map(PathBuf::from));

        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => lookup("BL_SEED")
                .map(|v| {
                    v.trim().parse().map_err(|_| ConfigError::Invalid {
                        var: "BL_SEED".to_string(),
                        reason: format!("'{v}' is not an unsigned integer"),
                    })
                })
                .transpose()?,
        };

        let shuffle = !overrides.no_shuffle && parse_var_or(&lookup, "BL_SHUFFLE", true);

        let occupied = match overrides.occupied {
            Some(list) => parse_occupied("--occupied", &list)?,
            None => match lookup("BL_OCCUPIED_TABLES") {
                Some(list) => parse_occupied("BL_OCCUPIED_TABLES", &list)?,
                None => BTreeSet::new(),
            },
        };

        let pretty = overrides.pretty || parse_var_or(&lookup, "BL_PRETTY", false);

        Ok(CliConfig {
            players_file,
            seed,
            shuffle,
            occupied,
            pretty,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed.is_some() && !self.shuffle {
            return Err(ConfigError::Invalid {
                var: "BL_SEED".to_string(),
                reason: "A seed has no effect when shuffling is disabled".to_string(),
            });
        }

        if let Some(path) = &self.players_file
            && !path.is_file()
        {
            return Err(ConfigError::Invalid {
                var: "BL_PLAYERS_FILE".to_string(),
                reason: format!("{} is not a readable file", path.display()),
            });
        }

        Ok(())
    }

    /// Allocator matching the shuffle settings
    pub fn allocator(&self) -> TableAllocator {
        match (self.shuffle, self.seed) {
            (false, _) => TableAllocator::unshuffled(),
            (true, Some(seed)) => TableAllocator::seeded(seed),
            (true, None) => TableAllocator::new(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_var_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a comma separated list of table numbers, e.g. `1,3,4`
fn parse_occupied(var: &str, list: &str) -> Result<BTreeSet<TableNumber>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.parse::<TableNumber>() {
            Ok(number) if number > 0 => Ok(number),
            _ => Err(ConfigError::Invalid {
                var: var.to_string(),
                reason: format!("'{item}' is not a table number"),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = CliConfig::from_lookup(CliOverrides::default(), lookup(&[])).unwrap();
        assert_eq!(config.players_file, None);
        assert_eq!(config.seed, None);
        assert!(config.shuffle);
        assert!(config.occupied.is_empty());
        assert!(!config.pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_values() {
        let config = CliConfig::from_lookup(
            CliOverrides::default(),
            lookup(&[
                ("BL_SEED", "42"),
                ("BL_OCCUPIED_TABLES", "1, 3,4"),
                ("BL_PRETTY", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.occupied, [1, 3, 4].into_iter().collect());
        assert!(config.pretty);
        assert!(config.allocator().is_shuffling());
    }

    #[test]
    fn test_overrides_beat_environment() {
        let overrides = CliOverrides {
            seed: Some(7),
            no_shuffle: true,
            occupied: Some("2".to_string()),
            ..CliOverrides::default()
        };
        let config = CliConfig::from_lookup(
            overrides,
            lookup(&[("BL_SEED", "42"), ("BL_SHUFFLE", "true"), ("BL_OCCUPIED_TABLES", "1")]),
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert!(!config.shuffle);
        assert_eq!(config.occupied, [2].into_iter().collect());
        assert!(!config.allocator().is_shuffling());
    }

    #[test]
    fn test_invalid_seed() {
        let err = CliConfig::from_lookup(CliOverrides::default(), lookup(&[("BL_SEED", "abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("BL_SEED"));
    }

    #[test]
    fn test_invalid_occupied_tables() {
        for list in ["0", "1,x", "-2"] {
            let err = CliConfig::from_lookup(
                CliOverrides::default(),
                lookup(&[("BL_OCCUPIED_TABLES", list)]),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{list}");
        }
    }

    #[test]
    fn test_seed_without_shuffle_is_rejected() {
        let config = CliConfig {
            players_file: None,
            seed: Some(1),
            shuffle: false,
            occupied: BTreeSet::new(),
            pretty: false,
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_players_file_is_rejected() {
        let config = CliConfig {
            players_file: Some(PathBuf::from("/nonexistent/roster.json")),
            seed: None,
            shuffle: true,
            occupied: BTreeSet::new(),
            pretty: false,
        };
        assert!(config.validate().is_err());
    }
}
