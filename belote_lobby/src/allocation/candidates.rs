//! Candidate generation: every table-count quadruple the pool can fill.

use super::models::{Player, TableQuota, TableSize};

/// Headcounts of a pool that bound the table counts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PoolProfile {
    /// Pool size (N).
    pub players: usize,
    /// Tarot-capable players (T).
    pub tarot: usize,
    /// Two-table-capable players (D).
    pub two_tables: usize,
    /// Players holding at least one of the two roles.
    pub role_holders: usize,
}

impl PoolProfile {
    pub fn of(players: &[Player]) -> Self {
        players.iter().fold(Self::default(), |mut profile, player| {
            profile.players += 1;
            profile.tarot += usize::from(player.can_play_tarot);
            profile.two_tables += usize::from(player.can_play_two_tables);
            profile.role_holders += usize::from(player.holds_role());
            profile
        })
    }

    /// Upper bound on the number of tables of `size`.
    pub fn max_tables(&self, size: TableSize) -> usize {
        match size {
            TableSize::Four => self.players / 4,
            TableSize::Five => self.tarot / 5,
            TableSize::Six => self.players / 6,
            // each anchor serves a single table per run
            TableSize::Seven => self.two_tables,
        }
    }

    /// Whether the tarot seats and the seven-seat anchors of `quota` can be
    /// given to distinct players.
    ///
    /// A player holding both flags can take a tarot seat or anchor a table,
    /// never both, so the two demands together must fit in the role holders.
    pub fn can_staff(&self, quota: &TableQuota) -> bool {
        let tarot_seats = quota.fives * TableSize::Five.seats();
        tarot_seats <= self.tarot
            && quota.sevens <= self.two_tables
            && tarot_seats + quota.sevens <= self.role_holders
    }
}

/// Enumerates every quadruple within the profile bounds that seats at most
/// `profile.players`, in ascending `(fours, fives, sixes, sevens)` order.
///
/// The zero quadruple is always present, so the result is never empty.
pub fn enumerate_candidates(profile: &PoolProfile) -> Vec<TableQuota> {
    let mut candidates = Vec::new();
    for fours in 0..=profile.max_tables(TableSize::Four) {
        for fives in 0..=profile.max_tables(TableSize::Five) {
            for sixes in 0..=profile.max_tables(TableSize::Six) {
                for sevens in 0..=profile.max_tables(TableSize::Seven) {
                    let quota = TableQuota::new(fours, fives, sixes, sevens);
                    if quota.seats() > profile.players {
                        // seats only grow with sevens
                        break;
                    }
                    if profile.can_staff(&quota) {
                        candidates.push(quota);
                    }
                }
            }
        }
    }
    candidates
}
