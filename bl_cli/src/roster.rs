//! Roster input: the players to seat, read as JSON.

use belote_lobby::allocation::{AllocationRequest, Player, TableNumber};
use serde::Deserialize;
use std::{collections::BTreeSet, io::Read};

/// Either a bare array of players or an object that also names the
/// occupied tables.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Roster {
    Players(Vec<Player>),
    Session {
        players: Vec<Player>,
        #[serde(default)]
        occupied: BTreeSet<TableNumber>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Failed to read roster: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid roster JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Player {0} is listed twice")]
    DuplicatePlayer(String),
}

impl Roster {
    pub fn from_reader(mut reader: impl Read) -> Result<Self, RosterError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let roster: Roster = serde_json::from_str(&input)?;
        roster.check_unique()?;
        Ok(roster)
    }

    pub fn players(&self) -> &[Player] {
        match self {
            Self::Players(players) | Self::Session { players, .. } => players,
        }
    }

    /// Names are compared exactly as written.
    fn check_unique(&self) -> Result<(), RosterError> {
        let mut seen = BTreeSet::new();
        for player in self.players() {
            if !seen.insert(&player.name) {
                return Err(RosterError::DuplicatePlayer(player.name.to_string()));
            }
        }
        Ok(())
    }

    /// Allocation request with the roster's own occupied tables plus `extra`
    pub fn into_request(self, extra: &BTreeSet<TableNumber>) -> AllocationRequest {
        let (players, occupied) = match self {
            Self::Players(players) => (players, BTreeSet::new()),
            Self::Session { players, occupied } => (players, occupied),
        };
        AllocationRequest::new(players).with_occupied(occupied.into_iter().chain(extra.iter().copied()))
    }
}
