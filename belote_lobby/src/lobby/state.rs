//! In-memory lobby owning every table, the waiting pool included.

use super::{
    config::LobbyConfig,
    errors::{LobbyError, LobbyResult},
    models::{AllocationSummary, LobbyUser, validate_name},
    view::{LobbyView, SeatView, TableView},
};
use crate::allocation::{AllocationRequest, Player, PlayerName, TableAllocator, TableName};
use std::{
    collections::{BTreeMap, HashMap},
    net::IpAddr,
};

/// Lobby state. Not synchronized: wrap it in a
/// [`LobbyActor`](super::LobbyActor) to share it.
pub struct Lobby {
    config: LobbyConfig,
    allocator: TableAllocator,
    /// Users per table, in seating order
    tables: BTreeMap<TableName, Vec<LobbyUser>>,
}

impl Lobby {
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation
    pub fn new(config: LobbyConfig) -> LobbyResult<Self> {
        config.validate().map_err(LobbyError::InvalidConfig)?;

        let allocator = config.allocator();
        Ok(Self {
            config,
            allocator,
            tables: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    /// No user anywhere, even if an empty waiting pool is still listed
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }

    /// Adds a user to the waiting pool, or refreshes an existing one.
    ///
    /// Returns `true` if the user is new. Names are matched exactly; a name
    /// breaking the lobby's name rules is refused with `InvalidName`.
    pub fn join(&mut self, name: &PlayerName, ip: Option<IpAddr>) -> LobbyResult<bool> {
        validate_name(name)?;

        if let Some(user) = self.tables.values_mut().flatten().find(|u| &u.name == name) {
            if let Some(ip) = ip {
                user.set_ip(ip);
            }
            log::debug!("User {} already in lobby {}", name, self.config.name);
            return Ok(false);
        }

        self.waiting_pool_mut()
            .push(LobbyUser::new(name.clone(), ip));
        log::info!("User {} joined lobby {}", name, self.config.name);
        Ok(true)
    }

    /// Marks a user ready or not. Returns the new state.
    pub fn set_ready(
        &mut self,
        name: &PlayerName,
        ready: bool,
        ip: Option<IpAddr>,
    ) -> LobbyResult<bool> {
        let user = self.user_mut(name, ip)?;
        user.ready = ready;
        Ok(user.ready)
    }

    /// Flips tarot capability. Returns the new value.
    pub fn toggle_tarot(&mut self, name: &PlayerName, ip: Option<IpAddr>) -> LobbyResult<bool> {
        let user = self.user_mut(name, ip)?;
        user.can_play_tarot = !user.can_play_tarot;
        Ok(user.can_play_tarot)
    }

    /// Flips two-table capability. Returns the new value.
    pub fn toggle_two_tables(
        &mut self,
        name: &PlayerName,
        ip: Option<IpAddr>,
    ) -> LobbyResult<bool> {
        let user = self.user_mut(name, ip)?;
        user.can_play_two_tables = !user.can_play_two_tables;
        Ok(user.can_play_two_tables)
    }

    /// Ends the game of `name`'s table: everyone at it goes back to the
    /// waiting pool, not ready, and the table disappears. Waiting users are
    /// left alone.
    pub fn finish(&mut self, name: &PlayerName, ip: Option<IpAddr>) -> LobbyResult<()> {
        let (table, index) = self
            .locate(name)
            .ok_or_else(|| LobbyError::UserNotFound(name.clone()))?;
        if !self.tables[&table][index].matches_ip(ip) {
            return Err(LobbyError::IpMismatch(name.clone()));
        }
        if table.is_waiting_pool() {
            return Ok(());
        }

        let mut users = self.tables.remove(&table).unwrap_or_default();
        users.iter_mut().for_each(LobbyUser::set_not_ready);
        log::info!(
            "{} finished by {}, {} players back in the waiting pool",
            table,
            name,
            users.len()
        );
        self.waiting_pool_mut().extend(users);
        Ok(())
    }

    /// Finishes the user's table, then removes the user from the lobby.
    pub fn quit(&mut self, name: &PlayerName, ip: Option<IpAddr>) -> LobbyResult<()> {
        self.finish(name, ip)?;
        self.waiting_pool_mut().retain(|u| &u.name != name);
        log::info!("User {} left lobby {}", name, self.config.name);
        Ok(())
    }

    /// Clears activity and readiness. Returns `false` if already inactive.
    pub fn admin_set_inactive(&mut self, name: &PlayerName) -> LobbyResult<bool> {
        let user = self.user_mut(name, None)?;
        if user.is_inactive() {
            return Ok(false);
        }
        user.set_inactive();
        Ok(true)
    }

    /// Sets every player of `table` ready or not. Returns whether any
    /// player changed.
    pub fn admin_set_table_ready(&mut self, table: TableName, ready: bool) -> LobbyResult<bool> {
        self.ensure_not_empty()?;
        let users = self
            .tables
            .get_mut(&table)
            .ok_or(LobbyError::TableNotFound(table))?;

        let mut changed = false;
        for user in users.iter_mut().filter(|u| u.ready != ready) {
            user.ready = ready;
            changed = true;
        }
        log::debug!("{} set ready={} (changed: {})", table, ready, changed);
        Ok(changed)
    }

    /// Seats the ready players of the waiting pool at new tables.
    ///
    /// Existing tables keep their numbers; players that cannot be seated
    /// stay in the waiting pool.
    pub fn generate_tables(&mut self) -> LobbyResult<AllocationSummary> {
        self.ensure_not_empty()?;

        let pool = self.waiting_pool_mut();
        let (ready, waiting): (Vec<_>, Vec<_>) = pool.drain(..).partition(|u| u.ready);
        *pool = waiting;

        let occupied = self.tables.keys().filter_map(TableName::number);
        let request =
            AllocationRequest::new(ready.iter().map(Player::from).collect()).with_occupied(occupied);
        let result = self.allocator.allocate(request);

        let mut by_name: HashMap<PlayerName, LobbyUser> =
            ready.into_iter().map(|u| (u.name.clone(), u)).collect();
        let mut take = |player: Player| {
            by_name.remove(&player.name).map(|mut user| {
                user.teams = player.teams;
                user
            })
        };

        let summary = AllocationSummary {
            created: result
                .tables
                .keys()
                .map(|&n| TableName::Numbered(n))
                .collect(),
            seated: result.seated(),
            deferred: result.waiting_pool.len(),
            quota: result.quota,
        };

        let mut seated_tables = Vec::with_capacity(result.tables.len());
        for (number, players) in result.tables {
            let users: Vec<LobbyUser> = players.into_iter().filter_map(&mut take).collect();
            seated_tables.push((TableName::Numbered(number), users));
        }
        let deferred: Vec<LobbyUser> = result.waiting_pool.into_iter().filter_map(&mut take).collect();

        self.tables.extend(seated_tables);
        let pool = self.waiting_pool_mut();
        pool.extend(deferred);
        pool.extend(by_name.into_values());

        log::info!(
            "Lobby {} generated {} tables ({}), {} ready players deferred",
            self.config.name,
            summary.created.len(),
            summary.quota,
            summary.deferred
        );
        Ok(summary)
    }

    /// Sends everybody back to the waiting pool and forgets their teams.
    pub fn clear_tables(&mut self) -> LobbyResult<()> {
        self.ensure_not_empty()?;

        let numbered: Vec<TableName> = self
            .tables
            .keys()
            .copied()
            .filter(|t| !t.is_waiting_pool())
            .collect();
        let mut returning = Vec::new();
        for table in numbered {
            returning.extend(self.tables.remove(&table).unwrap_or_default());
        }
        returning.iter_mut().for_each(|u| u.teams.clear());

        log::info!(
            "Lobby {} cleared, {} players back in the waiting pool",
            self.config.name,
            returning.len()
        );
        self.waiting_pool_mut().extend(returning);
        Ok(())
    }

    /// Clears every table, then generates new ones.
    pub fn shuffle_tables(&mut self) -> LobbyResult<AllocationSummary> {
        self.clear_tables()?;
        self.generate_tables()
    }

    /// Moves the players of `table` to the waiting pool and drops the table.
    pub fn delete_table(&mut self, table: TableName) -> LobbyResult<()> {
        if table.is_waiting_pool() {
            return Err(LobbyError::WaitingPoolProtected);
        }
        self.ensure_not_empty()?;

        let users = self
            .tables
            .remove(&table)
            .ok_or(LobbyError::TableNotFound(table))?;
        log::info!("{} deleted, {} players moved", table, users.len());
        self.waiting_pool_mut().extend(users);
        Ok(())
    }

    /// Forgets every user and table.
    pub fn reset(&mut self) {
        self.tables.clear();
        log::info!("Lobby {} reset", self.config.name);
    }

    pub fn view(&self) -> LobbyView {
        let tables = self
            .tables
            .iter()
            .map(|(name, users)| TableView {
                name: *name,
                seats: users.iter().map(SeatView::from).collect(),
            })
            .collect();
        LobbyView { tables }
    }

    pub fn users(&self) -> Vec<LobbyUser> {
        self.tables.values().flatten().cloned().collect()
    }

    pub fn user(&self, name: &PlayerName) -> Option<&LobbyUser> {
        self.tables.values().flatten().find(|u| &u.name == name)
    }

    pub fn table_of(&self, name: &PlayerName) -> Option<TableName> {
        self.locate(name).map(|(table, _)| table)
    }

    fn locate(&self, name: &PlayerName) -> Option<(TableName, usize)> {
        self.tables.iter().find_map(|(table, users)| {
            users
                .iter()
                .position(|u| &u.name == name)
                .map(|index| (*table, index))
        })
    }

    /// User called `name` reachable from `ip`. A matching request refreshes
    /// the user's activity.
    fn user_mut(&mut self, name: &PlayerName, ip: Option<IpAddr>) -> LobbyResult<&mut LobbyUser> {
        self.ensure_not_empty()?;
        let user = self
            .tables
            .values_mut()
            .flatten()
            .find(|u| &u.name == name && u.matches_ip(ip))
            .ok_or_else(|| LobbyError::UserNotFound(name.clone()))?;
        if ip.is_some() {
            user.touch();
        }
        Ok(user)
    }

    fn ensure_not_empty(&self) -> LobbyResult<()> {
        if self.is_empty() {
            return Err(LobbyError::EmptyLobby);
        }
        Ok(())
    }

    fn waiting_pool_mut(&mut self) -> &mut Vec<LobbyUser> {
        self.tables.entry(TableName::WaitingPool).or_default()
    }
}
