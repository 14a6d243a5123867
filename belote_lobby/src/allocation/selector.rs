//! Combination selection and overflow handling.

use super::models::{Player, TableQuota};

/// Quadruple chosen for building, with the headcount it seats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selection {
    pub quota: TableQuota,
    pub seated: usize,
}

impl Selection {
    /// Players that must wait for the next round.
    pub fn deferred(&self, players: usize) -> usize {
        players.saturating_sub(self.seated)
    }

    pub fn is_perfect(&self, players: usize) -> bool {
        self.seated == players
    }
}

/// Picks the candidate seating the most players, then the one with the
/// most four-seat tables. Remaining ties go to the earliest candidate.
///
/// Returns `None` only for an empty candidate list.
pub fn select_combination(candidates: &[TableQuota], players: usize) -> Option<Selection> {
    let seated = (0..=players)
        .rev()
        .find(|&k| candidates.iter().any(|c| c.seats() == k))?;

    let mut best: Option<TableQuota> = None;
    for candidate in candidates.iter().filter(|c| c.seats() == seated) {
        match best {
            Some(current) if candidate.fours <= current.fours => {}
            _ => best = Some(*candidate),
        }
    }

    best.map(|quota| Selection { quota, seated })
}

/// Indices, in pool order, of the `count` players sent back to the waiting
/// pool before building.
///
/// Players holding no role go first. When there are not enough of them, the
/// first `count` players whose roles the chosen quota does not need are
/// taken instead: tarot players only if no five-seat table is planned,
/// two-table players only if no seven-seat table is planned.
pub fn choose_deferred(players: &[Player], quota: &TableQuota, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }

    let plain: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_plain())
        .map(|(i, _)| i)
        .take(count)
        .collect();
    if plain.len() == count {
        return plain;
    }

    players
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            (!p.can_play_tarot || quota.fives == 0) && (!p.can_play_two_tables || quota.sevens == 0)
        })
        .map(|(i, _)| i)
        .take(count)
        .collect()
}
