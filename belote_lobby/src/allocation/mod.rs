//! Table allocation engine.
//!
//! Turns a snapshot of ready players into tables of four, five, six or seven
//! seats. A run goes through four stages:
//!
//! - [`candidates`]: every `(fours, fives, sixes, sevens)` quadruple the pool
//!   can fill, bounded by headcount, tarot players and two-table players
//! - [`selector`]: the quadruple seating the most players, then the one with
//!   the most four-seat tables; players that cannot be seated are deferred
//! - [`builder`]: tables carved from the shuffled pool, tarot first, then
//!   anchored seven-seat tables, fours and sixes; team colors assigned
//! - [`AllocationResult`]: numbered tables plus the waiting-pool remainder
//!
//! The engine is a pure computation. Its only non-determinism is the shuffle
//! applied before building, which the caller controls through
//! [`TableAllocator::seeded`] or [`TableAllocator::unshuffled`].
//!
//! ## Example
//!
//! ```
//! use belote_lobby::allocation::{AllocationRequest, Player, TableAllocator};
//!
//! let players: Vec<Player> = (0..9)
//!     .map(|i| {
//!         let player = Player::new(&format!("player{i}"));
//!         if i < 5 { player.with_tarot() } else { player }
//!     })
//!     .collect();
//!
//! let result = TableAllocator::seeded(7).allocate(AllocationRequest::new(players));
//! assert_eq!(result.table_sizes(), vec![4, 5]);
//! assert!(result.waiting_pool.is_empty());
//! ```

pub mod builder;
pub mod candidates;
pub mod models;
pub mod selector;

pub use builder::{BuildOutcome, assign_teams, build_tables};
pub use candidates::{PoolProfile, enumerate_candidates};
pub use models::{
    AllocationRequest, AllocationResult, PALETTE, ParseTableNameError, Player, PlayerName,
    TABLE_PREFIX, TableName, TableNumber, TableQuota, TableSize, TeamColor, WAITING_POOL,
};
pub use selector::{Selection, choose_deferred, select_combination};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::HashSet;

/// Runs allocations with an owned source of randomness.
pub struct TableAllocator {
    /// Shuffles the pool before building; `None` keeps pool order.
    rng: Option<StdRng>,
}

impl TableAllocator {
    /// Allocator shuffling with an OS-seeded generator
    pub fn new() -> Self {
        Self {
            rng: Some(StdRng::from_os_rng()),
        }
    }

    /// Allocator with a reproducible shuffle
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng: Some(rng) }
    }

    /// Allocator that keeps the pool in the order given
    pub fn unshuffled() -> Self {
        Self { rng: None }
    }

    pub fn is_shuffling(&self) -> bool {
        self.rng.is_some()
    }

    /// Seats as many players of `request` as possible.
    ///
    /// # Panics
    ///
    /// Panics if two players share a name.
    pub fn allocate(&mut self, request: AllocationRequest) -> AllocationResult {
        let AllocationRequest {
            mut players,
            occupied,
        } = request;
        assert_unique_names(&players);

        if let Some(rng) = self.rng.as_mut() {
            players.shuffle(rng);
        }

        let total = players.len();
        let profile = PoolProfile::of(&players);
        let candidates = enumerate_candidates(&profile);
        let Some(selection) = select_combination(&candidates, total) else {
            log::warn!("No table combination for {} players", total);
            return AllocationResult::all_waiting(players);
        };
        log::debug!(
            "Chose {} for {} players ({} tarot, {} two-table), {} seated",
            selection.quota,
            total,
            profile.tarot,
            profile.two_tables,
            selection.seated
        );

        let deferred = choose_deferred(&players, &selection.quota, selection.deferred(total));
        let (mut waiting_pool, mut working) = split_off(players, &deferred);
        working.iter_mut().for_each(Player::reset_teams);

        let outcome = build_tables(working, selection.quota, &occupied);
        if !outcome.leftovers.is_empty() {
            log::warn!(
                "{} players left without a table after building {}",
                outcome.leftovers.len(),
                selection.quota
            );
        }
        waiting_pool.extend(outcome.leftovers);

        let result = AllocationResult {
            tables: outcome.tables,
            waiting_pool,
            quota: selection.quota,
        };
        log::info!(
            "Allocated {} players: {} tables, {} seated, {} waiting",
            total,
            result.tables.len(),
            result.seated(),
            result.waiting_pool.len()
        );
        result
    }
}

impl Default for TableAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off allocation with a fresh random shuffle and no occupied tables.
pub fn allocate(players: Vec<Player>) -> AllocationResult {
    TableAllocator::new().allocate(AllocationRequest::new(players))
}

fn assert_unique_names(players: &[Player]) {
    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        assert!(
            seen.insert(&player.name),
            "duplicate player name in allocation pool: {}",
            player.name
        );
    }
}

/// Splits `players` into those at `indices` and the rest, both in pool order.
fn split_off(players: Vec<Player>, indices: &[usize]) -> (Vec<Player>, Vec<Player>) {
    let picked: HashSet<usize> = indices.iter().copied().collect();
    let (taken, kept): (Vec<_>, Vec<_>) = players
        .into_iter()
        .enumerate()
        .partition(|(i, _)| picked.contains(i));
    (
        taken.into_iter().map(|(_, p)| p).collect(),
        kept.into_iter().map(|(_, p)| p).collect(),
    )
}
