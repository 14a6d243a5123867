//! Lobby session model driving the allocation engine.
//!
//! This module implements:
//! - Lobby: in-memory tables and waiting pool, with join/ready/finish/quit
//!   and the admin operations (generate, shuffle, clear, delete)
//! - LobbyActor: tokio task owning a Lobby, reached through an mpsc inbox
//!   so table generation never races a join or a ready toggle
//! - LobbyView: client-facing snapshot, waiting pool first
//!
//! ## Example
//!
//! ```
//! use belote_lobby::allocation::{PlayerName, TableName};
//! use belote_lobby::lobby::{Lobby, LobbyConfig};
//!
//! let mut lobby = Lobby::new(LobbyConfig::default()).unwrap();
//! for name in ["ana", "bob", "chloe", "dan"] {
//!     let name = PlayerName::new(name);
//!     lobby.join(&name, None).unwrap();
//!     lobby.set_ready(&name, true, None).unwrap();
//! }
//!
//! let summary = lobby.generate_tables().unwrap();
//! assert_eq!(summary.created, vec![TableName::Numbered(1)]);
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod messages;
pub mod models;
pub mod state;
pub mod view;

pub use actor::{LobbyActor, LobbyHandle};
pub use config::LobbyConfig;
pub use errors::{LobbyError, LobbyResult};
pub use messages::{LobbyEvent, LobbyMessage, SubscriberId};
pub use models::{AllocationSummary, LobbyUser, MAX_NAME_LENGTH, validate_name};
pub use state::Lobby;
pub use view::{LobbyView, SeatView, TableView};
