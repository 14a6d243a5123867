//! Lobby actor serializing every lobby mutation through one inbox.

use super::{
    config::LobbyConfig,
    errors::{LobbyError, LobbyResult},
    messages::{LobbyEvent, LobbyMessage, SubscriberId},
    models::{AllocationSummary, LobbyUser},
    state::Lobby,
    view::LobbyView,
};
use crate::allocation::{PlayerName, TableName};
use std::{collections::HashMap, net::IpAddr};
use tokio::sync::{mpsc, oneshot};

/// Lobby actor handle for sending messages
#[derive(Clone)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyMessage>,
    subscriber_capacity: usize,
}

impl LobbyHandle {
    /// Send a raw message to the lobby
    pub async fn send(&self, message: LobbyMessage) -> LobbyResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| LobbyError::Closed)
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> LobbyMessage,
    ) -> LobbyResult<T> {
        let (response, reply) = oneshot::channel();
        self.send(message(response)).await?;
        reply.await.map_err(|_| LobbyError::Closed)
    }

    pub async fn join(&self, name: PlayerName, ip: Option<IpAddr>) -> LobbyResult<bool> {
        self.request(|response| LobbyMessage::Join { name, ip, response })
            .await?
    }

    pub async fn set_ready(
        &self,
        name: PlayerName,
        ready: bool,
        ip: Option<IpAddr>,
    ) -> LobbyResult<bool> {
        self.request(|response| LobbyMessage::SetReady {
            name,
            ready,
            ip,
            response,
        })
        .await?
    }

    pub async fn toggle_tarot(&self, name: PlayerName, ip: Option<IpAddr>) -> LobbyResult<bool> {
        self.request(|response| LobbyMessage::ToggleTarot { name, ip, response })
            .await?
    }

    pub async fn toggle_two_tables(
        &self,
        name: PlayerName,
        ip: Option<IpAddr>,
    ) -> LobbyResult<bool> {
        self.request(|response| LobbyMessage::ToggleTwoTables { name, ip, response })
            .await?
    }

    pub async fn finish(&self, name: PlayerName, ip: Option<IpAddr>) -> LobbyResult<()> {
        self.request(|response| LobbyMessage::Finish { name, ip, response })
            .await?
    }

    pub async fn quit(&self, name: PlayerName, ip: Option<IpAddr>) -> LobbyResult<()> {
        self.request(|response| LobbyMessage::Quit { name, ip, response })
            .await?
    }

    pub async fn set_inactive(&self, name: PlayerName) -> LobbyResult<bool> {
        self.request(|response| LobbyMessage::SetInactive { name, response })
            .await?
    }

    pub async fn set_table_ready(&self, table: TableName, ready: bool) -> LobbyResult<bool> {
        self.request(|response| LobbyMessage::SetTableReady {
            table,
            ready,
            response,
        })
        .await?
    }

    pub async fn generate_tables(&self) -> LobbyResult<AllocationSummary> {
        self.request(|response| LobbyMessage::GenerateTables { response })
            .await?
    }

    pub async fn shuffle_tables(&self) -> LobbyResult<AllocationSummary> {
        self.request(|response| LobbyMessage::ShuffleTables { response })
            .await?
    }

    pub async fn clear_tables(&self) -> LobbyResult<()> {
        self.request(|response| LobbyMessage::ClearTables { response })
            .await?
    }

    pub async fn delete_table(&self, table: TableName) -> LobbyResult<()> {
        self.request(|response| LobbyMessage::DeleteTable { table, response })
            .await?
    }

    pub async fn reset(&self) -> LobbyResult<()> {
        self.request(|response| LobbyMessage::Reset { response })
            .await
    }

    pub async fn view(&self) -> LobbyResult<LobbyView> {
        self.request(|response| LobbyMessage::GetView { response })
            .await
    }

    pub async fn users(&self) -> LobbyResult<Vec<LobbyUser>> {
        self.request(|response| LobbyMessage::GetUsers { response })
            .await
    }

    /// Register for table change notifications under `id`
    pub async fn subscribe(&self, id: SubscriberId) -> LobbyResult<mpsc::Receiver<LobbyEvent>> {
        let (sender, receiver) = mpsc::channel(self.subscriber_capacity);
        self.send(LobbyMessage::Subscribe { id, sender }).await?;
        Ok(receiver)
    }

    pub async fn unsubscribe(&self, id: SubscriberId) -> LobbyResult<()> {
        self.send(LobbyMessage::Unsubscribe { id }).await
    }

    pub async fn close(&self) -> LobbyResult<()> {
        self.send(LobbyMessage::Close).await
    }
}

/// Lobby actor owning a [`Lobby`]
pub struct LobbyActor {
    lobby: Lobby,

    /// Message inbox
    inbox: mpsc::Receiver<LobbyMessage>,

    /// Subscribers for table change notifications
    subscribers: HashMap<SubscriberId, mpsc::Sender<LobbyEvent>>,

    is_closed: bool,
}

impl LobbyActor {
    /// Create a new lobby actor
    ///
    /// # Returns
    ///
    /// * `LobbyResult<(LobbyActor, LobbyHandle)>` - Actor and handle for sending messages
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation
    pub fn new(config: LobbyConfig) -> LobbyResult<(Self, LobbyHandle)> {
        // validates the capacities used below
        let lobby = Lobby::new(config)?;
        let config = lobby.config();

        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let handle = LobbyHandle {
            sender,
            subscriber_capacity: config.subscriber_capacity,
        };

        let actor = Self {
            lobby,
            inbox,
            subscribers: HashMap::new(),
            is_closed: false,
        };

        Ok((actor, handle))
    }

    /// Create the actor and run it on the current tokio runtime
    pub fn spawn(config: LobbyConfig) -> LobbyResult<LobbyHandle> {
        let (actor, handle) = Self::new(config)?;
        tokio::spawn(actor.run());
        Ok(handle)
    }

    /// Run the lobby event loop until closed or every handle is dropped
    pub async fn run(mut self) {
        log::info!("Lobby '{}' starting", self.lobby.config().name);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.is_closed {
                break;
            }
        }

        log::info!("Lobby '{}' closed", self.lobby.config().name);
    }

    fn handle_message(&mut self, message: LobbyMessage) {
        match message {
            LobbyMessage::Join { name, ip, response } => {
                let result = self.lobby.join(&name, ip);
                if matches!(result, Ok(true)) {
                    self.notify(format!("{name} joined"));
                }
                let _ = response.send(result);
            }

            LobbyMessage::SetReady {
                name,
                ready,
                ip,
                response,
            } => {
                let result = self.lobby.set_ready(&name, ready, ip);
                self.notify_if_ok(&result, || format!("{name} ready: {ready}"));
                let _ = response.send(result);
            }

            LobbyMessage::ToggleTarot { name, ip, response } => {
                let result = self.lobby.toggle_tarot(&name, ip);
                self.notify_if_ok(&result, || format!("{name} changed tarot preference"));
                let _ = response.send(result);
            }

            LobbyMessage::ToggleTwoTables { name, ip, response } => {
                let result = self.lobby.toggle_two_tables(&name, ip);
                self.notify_if_ok(&result, || format!("{name} changed two-table preference"));
                let _ = response.send(result);
            }

            LobbyMessage::Finish { name, ip, response } => {
                let result = self.lobby.finish(&name, ip);
                self.notify_if_ok(&result, || format!("{name} finished"));
                let _ = response.send(result);
            }

            LobbyMessage::Quit { name, ip, response } => {
                let result = self.lobby.quit(&name, ip);
                self.notify_if_ok(&result, || format!("{name} quit"));
                let _ = response.send(result);
            }

            LobbyMessage::SetInactive { name, response } => {
                let result = self.lobby.admin_set_inactive(&name);
                if matches!(result, Ok(true)) {
                    self.notify(format!("{name} set inactive"));
                }
                let _ = response.send(result);
            }

            LobbyMessage::SetTableReady {
                table,
                ready,
                response,
            } => {
                let result = self.lobby.admin_set_table_ready(table, ready);
                if matches!(result, Ok(true)) {
                    self.notify(format!("{table} ready: {ready}"));
                }
                let _ = response.send(result);
            }

            LobbyMessage::GenerateTables { response } => {
                let result = self.lobby.generate_tables();
                self.notify_if_ok(&result, || "tables generated".to_string());
                let _ = response.send(result);
            }

            LobbyMessage::ShuffleTables { response } => {
                let result = self.lobby.shuffle_tables();
                self.notify_if_ok(&result, || "tables shuffled".to_string());
                let _ = response.send(result);
            }

            LobbyMessage::ClearTables { response } => {
                let result = self.lobby.clear_tables();
                self.notify_if_ok(&result, || "tables cleared".to_string());
                let _ = response.send(result);
            }

            LobbyMessage::DeleteTable { table, response } => {
                let result = self.lobby.delete_table(table);
                self.notify_if_ok(&result, || format!("{table} deleted"));
                let _ = response.send(result);
            }

            LobbyMessage::Reset { response } => {
                self.lobby.reset();
                self.notify("lobby reset".to_string());
                let _ = response.send(());
            }

            LobbyMessage::GetView { response } => {
                let _ = response.send(self.lobby.view());
            }

            LobbyMessage::GetUsers { response } => {
                let _ = response.send(self.lobby.users());
            }

            LobbyMessage::Subscribe { id, sender } => {
                self.subscribers.insert(id, sender);
                log::debug!("Subscriber {} registered", id);
            }

            LobbyMessage::Unsubscribe { id } => {
                self.subscribers.remove(&id);
                log::debug!("Subscriber {} unregistered", id);
            }

            LobbyMessage::Close => {
                self.is_closed = true;
            }
        }
    }

    fn notify_if_ok<T>(&mut self, result: &LobbyResult<T>, reason: impl FnOnce() -> String) {
        if result.is_ok() {
            self.notify(reason());
        }
    }

    /// Broadcast a table change to all subscribers
    fn notify(&mut self, reason: String) {
        let event = LobbyEvent::tables_changed(reason);
        self.subscribers
            .retain(|id, sender| match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber {} channel full, dropping notification", id);
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", id);
                    false
                }
            });
    }
}
