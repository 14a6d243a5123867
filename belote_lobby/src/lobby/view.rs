//! Client-facing snapshot of the lobby tables.

use super::models::LobbyUser;
use crate::allocation::{AllocationResult, Player, PlayerName, TableName, TeamColor};
use serde::{Serialize, Serializer};

/// One seat as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub name: PlayerName,
    pub ready: bool,
    pub teams: Vec<TeamColor>,
    pub can_play_tarot: bool,
    pub can_play_two_tables: bool,
}

impl From<&LobbyUser> for SeatView {
    fn from(user: &LobbyUser) -> Self {
        Self {
            name: user.name.clone(),
            ready: user.ready,
            teams: user.teams.clone(),
            can_play_tarot: user.can_play_tarot,
            can_play_two_tables: user.can_play_two_tables,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub name: TableName,
    pub seats: Vec<SeatView>,
}

/// Tables in display order: waiting pool first, then by table number.
///
/// Serializes as a JSON object keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LobbyView {
    pub tables: Vec<TableView>,
}

impl LobbyView {
    /// View of a bare allocation run. Everyone in it was ready.
    pub fn from_allocation(result: &AllocationResult) -> Self {
        let tables = result
            .named_tables()
            .into_iter()
            .map(|(name, players)| TableView {
                name,
                seats: players.iter().map(ready_seat).collect(),
            })
            .collect();
        Self { tables }
    }

    pub fn table(&self, name: TableName) -> Option<&TableView> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn seat_count(&self) -> usize {
        self.tables.iter().map(|t| t.seats.len()).sum()
    }
}

fn ready_seat(player: &Player) -> SeatView {
    SeatView {
        name: player.name.clone(),
        ready: true,
        teams: player.teams.clone(),
        can_play_tarot: player.can_play_tarot,
        can_play_two_tables: player.can_play_two_tables,
    }
}

impl Serialize for LobbyView {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.tables.iter().map(|t| (t.name, &t.seats)))
    }
}
