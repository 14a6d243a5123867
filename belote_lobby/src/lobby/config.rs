//! Lobby configuration models.

use crate::allocation::TableAllocator;
use serde::{Deserialize, Serialize};

/// Lobby configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Lobby name, used in logs
    pub name: String,

    /// Fixed shuffle seed for reproducible table generation
    pub allocation_seed: Option<u64>,

    /// Shuffle ready players before building tables (default: true)
    pub shuffle_players: bool,

    /// Capacity of the actor inbox (default: 100)
    pub inbox_capacity: usize,

    /// Capacity of each subscriber's notification channel (default: 16)
    pub subscriber_capacity: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            name: "belote".to_string(),
            allocation_seed: None,
            shuffle_players: true,
            inbox_capacity: 100,
            subscriber_capacity: 16,
        }
    }
}

impl LobbyConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Lobby name must not be empty".to_string());
        }

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be at least 1".to_string());
        }

        if self.subscriber_capacity == 0 {
            return Err("Subscriber capacity must be at least 1".to_string());
        }

        if !self.shuffle_players && self.allocation_seed.is_some() {
            return Err("A shuffle seed has no effect when shuffling is disabled".to_string());
        }

        Ok(())
    }

    /// Allocator honoring the shuffle settings
    pub fn allocator(&self) -> TableAllocator {
        match (self.shuffle_players, self.allocation_seed) {
            (false, _) => TableAllocator::unshuffled(),
            (true, Some(seed)) => TableAllocator::seeded(seed),
            (true, None) => TableAllocator::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LobbyConfig::default().validate().is_ok());
        assert!(LobbyConfig::default().allocator().is_shuffling());
    }

    #[test]
    fn test_zero_inbox_rejected() {
        let config = LobbyConfig {
            inbox_capacity: 0,
            ..LobbyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_without_shuffle_rejected() {
        let config = LobbyConfig {
            shuffle_players: false,
            allocation_seed: Some(3),
            ..LobbyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unshuffled_allocator() {
        let config = LobbyConfig {
            shuffle_players: false,
            ..LobbyConfig::default()
        };
        assert!(!config.allocator().is_shuffling());
    }
}
