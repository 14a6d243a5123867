//! Lobby actor message types.

use super::{
    errors::LobbyResult,
    models::{AllocationSummary, LobbyUser},
    view::LobbyView,
};
use crate::allocation::{PlayerName, TableName};
use std::{fmt, net::IpAddr};
use tokio::sync::{mpsc, oneshot};

/// Identifier chosen by a subscriber when registering.
pub type SubscriberId = u64;

/// Messages that can be sent to a LobbyActor
#[derive(Debug)]
pub enum LobbyMessage {
    /// Join the waiting pool (or refresh an existing user)
    Join {
        name: PlayerName,
        ip: Option<IpAddr>,
        response: oneshot::Sender<LobbyResult<bool>>,
    },

    SetReady {
        name: PlayerName,
        ready: bool,
        ip: Option<IpAddr>,
        response: oneshot::Sender<LobbyResult<bool>>,
    },

    ToggleTarot {
        name: PlayerName,
        ip: Option<IpAddr>,
        response: oneshot::Sender<LobbyResult<bool>>,
    },

    ToggleTwoTables {
        name: PlayerName,
        ip: Option<IpAddr>,
        response: oneshot::Sender<LobbyResult<bool>>,
    },

    /// End the game at the user's table
    Finish {
        name: PlayerName,
        ip: Option<IpAddr>,
        response: oneshot::Sender<LobbyResult<()>>,
    },

    /// Finish, then leave the lobby
    Quit {
        name: PlayerName,
        ip: Option<IpAddr>,
        response: oneshot::Sender<LobbyResult<()>>,
    },

    /// Mark a user inactive (admin only)
    SetInactive {
        name: PlayerName,
        response: oneshot::Sender<LobbyResult<bool>>,
    },

    /// Set a whole table ready or not (admin only)
    SetTableReady {
        table: TableName,
        ready: bool,
        response: oneshot::Sender<LobbyResult<bool>>,
    },

    /// Seat the ready players (admin only)
    GenerateTables {
        response: oneshot::Sender<LobbyResult<AllocationSummary>>,
    },

    /// Clear and regenerate every table (admin only)
    ShuffleTables {
        response: oneshot::Sender<LobbyResult<AllocationSummary>>,
    },

    /// Send everyone back to the waiting pool (admin only)
    ClearTables {
        response: oneshot::Sender<LobbyResult<()>>,
    },

    /// Dissolve one table (admin only)
    DeleteTable {
        table: TableName,
        response: oneshot::Sender<LobbyResult<()>>,
    },

    /// Forget every user (admin only)
    Reset { response: oneshot::Sender<()> },

    GetView { response: oneshot::Sender<LobbyView> },

    GetUsers {
        response: oneshot::Sender<Vec<LobbyUser>>,
    },

    /// Subscribe to table change notifications
    Subscribe {
        id: SubscriberId,
        sender: mpsc::Sender<LobbyEvent>,
    },

    /// Unsubscribe from table change notifications
    Unsubscribe { id: SubscriberId },

    /// Stop the actor
    Close,
}

/// Notification sent when the tables change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent {
    TablesChanged { reason: String },
}

impl LobbyEvent {
    pub fn tables_changed(reason: impl Into<String>) -> Self {
        Self::TablesChanged {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LobbyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TablesChanged { reason } => {
                write!(f, "you must refresh tables because: {reason}")
            }
        }
    }
}
