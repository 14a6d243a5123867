//! # Belote Lobby
//!
//! Seats a room of card players at belote, tarot and larger tables.
//!
//! Ready players are split into tables of four (belote), five (tarot, every
//! seat tarot-capable), six, or seven (anchored by a player able to follow
//! two tables). The split seats as many players as possible, then prefers
//! four-seat tables; whoever cannot be seated waits in the waiting pool
//! ("panama") for the next round.
//!
//! ## Core Modules
//!
//! - [`allocation`]: the table allocation engine, a pure function of a
//!   player snapshot and a shuffle
//! - [`lobby`]: in-memory session model and its single-writer actor
//!
//! ## Example
//!
//! ```
//! use belote_lobby::allocation::{AllocationRequest, Player, TableAllocator};
//!
//! let players = (0..12).map(|i| Player::new(&format!("p{i}"))).collect();
//! let result = TableAllocator::unshuffled().allocate(AllocationRequest::new(players));
//! assert_eq!(result.table_sizes(), vec![4, 4, 4]);
//! ```

pub mod allocation;
pub use allocation::{
    AllocationRequest, AllocationResult, Player, PlayerName, TableAllocator, TableName, allocate,
};

pub mod lobby;
pub use lobby::{Lobby, LobbyActor, LobbyConfig, LobbyError, LobbyHandle, LobbyResult};
