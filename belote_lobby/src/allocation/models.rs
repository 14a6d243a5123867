//! Allocation data model: players, table names, quotas and results.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};
use thiserror::Error;

/// Reserved name of the table holding every unseated player.
pub const WAITING_POOL: &str = "panama";

/// Prefix of generated table names ("Table 1", "Table 2", ...).
pub const TABLE_PREFIX: &str = "Table ";

/// Number assigned to a generated table. Always >= 1.
pub type TableNumber = u32;

/// Unique player identity inside a pool, kept exactly as given.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Team label handed out inside a table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Red,
    Black,
    Orange,
    Blue,
}

/// Palette indexed by seat position modulo the number of teams.
pub const PALETTE: [TeamColor; 4] = [
    TeamColor::Red,
    TeamColor::Black,
    TeamColor::Orange,
    TeamColor::Blue,
];

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Red => "red",
            Self::Black => "black",
            Self::Orange => "orange",
            Self::Blue => "blue",
        };
        write!(f, "{repr}")
    }
}

/// A ready participant as seen by the allocation engine.
///
/// The engine reads `name` and the two capability flags and only ever
/// writes `teams`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub name: PlayerName,
    /// May sit at a five-player tarot table.
    #[serde(default)]
    pub can_play_tarot: bool,
    /// May anchor a seven-player table by playing on two tables at once.
    #[serde(default)]
    pub can_play_two_tables: bool,
    #[serde(default)]
    pub teams: Vec<TeamColor>,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: PlayerName::new(name),
            can_play_tarot: false,
            can_play_two_tables: false,
            teams: Vec::new(),
        }
    }

    pub fn with_tarot(mut self) -> Self {
        self.can_play_tarot = true;
        self
    }

    pub fn with_two_tables(mut self) -> Self {
        self.can_play_two_tables = true;
        self
    }

    /// Neither tarot nor two-table capable.
    pub fn is_plain(&self) -> bool {
        !self.can_play_tarot && !self.can_play_two_tables
    }

    /// Holds at least one of the two special roles.
    pub fn holds_role(&self) -> bool {
        !self.is_plain()
    }

    pub fn reset_teams(&mut self) {
        self.teams.clear();
    }
}

/// Allowed table sizes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum TableSize {
    /// Belote, two teams of two.
    Four,
    /// Tarot, every seat tarot-capable, no teams.
    Five,
    /// Three teams of two.
    Six,
    /// Anchored by a two-table-capable player.
    Seven,
}

impl TableSize {
    pub const ALL: [TableSize; 4] = [Self::Four, Self::Five, Self::Six, Self::Seven];

    pub const fn seats(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
        }
    }

    pub fn from_seats(seats: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.seats() == seats)
    }
}

impl fmt::Display for TableSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-seat", self.seats())
    }
}

/// How many tables of each size to build.
///
/// Field order matters: the derived ordering is the ascending
/// `(fours, fives, sixes, sevens)` order candidates are enumerated in.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct TableQuota {
    pub fours: usize,
    pub fives: usize,
    pub sixes: usize,
    pub sevens: usize,
}

impl TableQuota {
    pub const fn new(fours: usize, fives: usize, sixes: usize, sevens: usize) -> Self {
        Self {
            fours,
            fives,
            sixes,
            sevens,
        }
    }

    /// Players seated when every table of the quota is built.
    pub const fn seats(&self) -> usize {
        4 * self.fours + 5 * self.fives + 6 * self.sixes + 7 * self.sevens
    }

    pub const fn tables(&self) -> usize {
        self.fours + self.fives + self.sixes + self.sevens
    }

    pub const fn is_exhausted(&self) -> bool {
        self.tables() == 0
    }

    pub const fn count(&self, size: TableSize) -> usize {
        match size {
            TableSize::Four => self.fours,
            TableSize::Five => self.fives,
            TableSize::Six => self.sixes,
            TableSize::Seven => self.sevens,
        }
    }
}

impl fmt::Display for TableQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x4 {}x5 {}x6 {}x7",
            self.fours, self.fives, self.sixes, self.sevens
        )
    }
}

/// Name of a lobby table.
///
/// The waiting pool sorts before every numbered table; numbered tables
/// sort by number, so "Table 2" comes before "Table 10".
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TableName {
    WaitingPool,
    Numbered(TableNumber),
}

impl TableName {
    pub fn number(&self) -> Option<TableNumber> {
        match self {
            Self::WaitingPool => None,
            Self::Numbered(n) => Some(*n),
        }
    }

    pub fn is_waiting_pool(&self) -> bool {
        matches!(self, Self::WaitingPool)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingPool => write!(f, "{WAITING_POOL}"),
            Self::Numbered(n) => write!(f, "{TABLE_PREFIX}{n}"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid table name: {0:?}")]
pub struct ParseTableNameError(pub String);

impl FromStr for TableName {
    type Err = ParseTableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WAITING_POOL {
            return Ok(Self::WaitingPool);
        }
        s.strip_prefix(TABLE_PREFIX)
            .and_then(|n| n.parse::<TableNumber>().ok())
            .filter(|&n| n > 0)
            .map(Self::Numbered)
            .ok_or_else(|| ParseTableNameError(s.to_string()))
    }
}

impl Serialize for TableName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TableName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Input of one allocation run.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AllocationRequest {
    /// Snapshot of the ready players. Names must be unique.
    pub players: Vec<Player>,
    /// Table numbers already in use by the caller; new tables skip them.
    #[serde(default)]
    pub occupied: BTreeSet<TableNumber>,
}

impl AllocationRequest {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            occupied: BTreeSet::new(),
        }
    }

    pub fn with_occupied(mut self, occupied: impl IntoIterator<Item = TableNumber>) -> Self {
        self.occupied.extend(occupied);
        self
    }
}

/// Output of one allocation run.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AllocationResult {
    /// Generated tables, each in seating order.
    pub tables: BTreeMap<TableNumber, Vec<Player>>,
    /// Players returned to the waiting pool.
    pub waiting_pool: Vec<Player>,
    /// Combination the tables were carved from.
    pub quota: TableQuota,
}

impl AllocationResult {
    /// Everyone unseated, no tables.
    pub fn all_waiting(players: Vec<Player>) -> Self {
        Self {
            tables: BTreeMap::new(),
            waiting_pool: players,
            quota: TableQuota::default(),
        }
    }

    pub fn seated(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn total_players(&self) -> usize {
        self.seated() + self.waiting_pool.len()
    }

    /// Sizes of the generated tables, ascending.
    pub fn table_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.tables.values().map(Vec::len).collect();
        sizes.sort_unstable();
        sizes
    }

    pub fn count_tables_of(&self, size: TableSize) -> usize {
        self.tables
            .values()
            .filter(|players| players.len() == size.seats())
            .count()
    }

    /// Table holding `name`, if any. The waiting pool counts as a table.
    pub fn table_of(&self, name: &PlayerName) -> Option<TableName> {
        if self.waiting_pool.iter().any(|p| &p.name == name) {
            return Some(TableName::WaitingPool);
        }
        self.tables
            .iter()
            .find(|(_, players)| players.iter().any(|p| &p.name == name))
            .map(|(n, _)| TableName::Numbered(*n))
    }

    /// Every table including the waiting pool, keyed by display name.
    pub fn named_tables(&self) -> BTreeMap<TableName, &[Player]> {
        let mut named: BTreeMap<TableName, &[Player]> = self
            .tables
            .iter()
            .map(|(n, players)| (TableName::Numbered(*n), players.as_slice()))
            .collect();
        named.insert(TableName::WaitingPool, self.waiting_pool.as_slice());
        named
    }
}
