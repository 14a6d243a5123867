//! Lobby user and run summary models.

use super::errors::{LobbyError, LobbyResult};
use crate::allocation::{Player, PlayerName, TableName, TableQuota, TeamColor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Checks a name before it enters the lobby. Names are never rewritten:
/// a name that breaks a rule is refused.
pub fn validate_name(name: &PlayerName) -> LobbyResult<()> {
    let reason = if name.as_str().trim().is_empty() {
        "must not be blank".to_string()
    } else if name.char_len() > MAX_NAME_LENGTH {
        format!("must be at most {MAX_NAME_LENGTH} characters")
    } else if name.as_str().chars().any(char::is_control) {
        "must not contain control characters".to_string()
    } else {
        return Ok(());
    };

    Err(LobbyError::InvalidName {
        name: name.clone(),
        reason,
    })
}

/// A participant known to the lobby, seated or waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyUser {
    pub name: PlayerName,
    /// Wants a seat at the next table generation
    pub ready: bool,
    pub can_play_tarot: bool,
    pub can_play_two_tables: bool,
    /// Team colors from the last allocation
    pub teams: Vec<TeamColor>,
    /// Address the user last joined from
    pub ip: Option<IpAddr>,
    /// Last time the user did something; `None` once marked inactive
    pub last_active_at: Option<DateTime<Utc>>,
}

impl LobbyUser {
    pub fn new(name: PlayerName, ip: Option<IpAddr>) -> Self {
        Self {
            name,
            ready: false,
            can_play_tarot: false,
            can_play_two_tables: false,
            teams: Vec::new(),
            last_active_at: ip.map(|_| Utc::now()),
            ip,
        }
    }

    pub fn touch(&mut self) {
        self.last_active_at = Some(Utc::now());
    }

    pub fn set_ip(&mut self, ip: IpAddr) {
        self.ip = Some(ip);
        self.touch();
    }

    pub fn set_not_ready(&mut self) {
        self.ready = false;
        self.touch();
    }

    pub fn set_inactive(&mut self) {
        self.last_active_at = None;
        self.ready = false;
    }

    pub fn is_inactive(&self) -> bool {
        self.last_active_at.is_none() && !self.ready
    }

    /// Whether a request coming from `ip` may act as this user.
    pub fn matches_ip(&self, ip: Option<IpAddr>) -> bool {
        ip.is_none_or(|ip| self.ip == Some(ip))
    }
}

impl From<&LobbyUser> for Player {
    fn from(user: &LobbyUser) -> Self {
        Self {
            name: user.name.clone(),
            can_play_tarot: user.can_play_tarot,
            can_play_two_tables: user.can_play_two_tables,
            teams: user.teams.clone(),
        }
    }
}

/// What a table generation did to the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Tables created by this run, ascending
    pub created: Vec<TableName>,
    pub seated: usize,
    /// Ready players sent back to the waiting pool
    pub deferred: usize,
    pub quota: TableQuota,
}
