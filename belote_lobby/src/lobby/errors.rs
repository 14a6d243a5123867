//! Error types for the lobby module

use crate::allocation::{PlayerName, TableName};
use thiserror::Error;

/// Result type for lobby operations
pub type LobbyResult<T> = Result<T, LobbyError>;

/// Lobby operation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LobbyError {
    /// No user with that name (or none reachable from that address)
    #[error("User not found: {0}")]
    UserNotFound(PlayerName),

    /// User exists but the request came from another address
    #[error("User {0} is bound to another address")]
    IpMismatch(PlayerName),

    /// Name refused on join
    #[error("Invalid player name '{name}': {reason}")]
    InvalidName { name: PlayerName, reason: String },

    #[error("Invalid lobby configuration: {0}")]
    InvalidConfig(String),

    #[error("Table not found: {0}")]
    TableNotFound(TableName),

    /// The waiting pool cannot be deleted
    #[error("The waiting pool cannot be removed")]
    WaitingPoolProtected,

    /// Nobody has joined yet
    #[error("Lobby is empty")]
    EmptyLobby,

    /// Lobby actor stopped
    #[error("Lobby is closed")]
    Closed,
}
