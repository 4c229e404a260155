#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure strategy system computing optimal egg drop plans.
//!
//! The worst-case drop count `T[eggs][floors]` follows the classic recurrence
//! `T[i][j] = min over x in 1..=j of 1 + max(T[i-1][x-1], T[i][j-x])`: a break
//! at relative floor `x` leaves `x-1` floors and one egg fewer, a survival
//! leaves the `j-x` floors above with the same eggs. Tables are tabulated
//! bottom-up and grown on demand, so repeated queries over shrinking floor
//! ranges within a session are answered from cache.

use egg_drop_core::{GameConfig, InvalidArgument, MAX_EGGS, MAX_FLOORS};
use tracing::trace;

/// Marker for drop counts that no strategy can achieve (floors left, no eggs).
const UNSOLVABLE: u32 = u32::MAX;

/// Memoizing engine answering drop-count and floor-suggestion queries.
///
/// The cached table only ever grows. Every cell depends solely on cells with
/// fewer eggs or fewer floors, so a table covering `(eggs, floors)` answers all
/// smaller sub-problems as well.
#[derive(Clone, Debug, Default)]
pub struct StrategyEngine {
    table: Vec<Vec<u32>>,
}

impl StrategyEngine {
    /// Creates an engine with an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { table: Vec::new() }
    }

    /// Minimum number of drops that determines the critical floor in the worst case.
    ///
    /// An egg count of zero is treated as a single egg. Zero floors need zero drops.
    pub fn min_drops(&mut self, eggs: u32, floors: u32) -> Result<u32, InvalidArgument> {
        let (eggs, floors) = validate(eggs, floors)?;
        let eggs = eggs.max(1);
        self.ensure(eggs, floors);
        Ok(self.table[eggs][floors])
    }

    /// Worst-case drop count for a validated game configuration.
    ///
    /// Infallible because [`GameConfig`] already enforces the supported bounds.
    pub fn optimal_drops(&mut self, config: &GameConfig) -> u32 {
        let eggs = config.total_eggs() as usize;
        let floors = config.total_floors() as usize;
        self.ensure(eggs, floors);
        self.table[eggs][floors]
    }

    /// Smallest relative floor whose drop achieves [`Self::min_drops`].
    ///
    /// Lower floors win ties. With at most one egg or at most one floor the
    /// answer is always `1`: test the very next floor.
    pub fn optimal_offset(&mut self, eggs: u32, floors: u32) -> Result<u32, InvalidArgument> {
        let (eggs, floors) = validate(eggs, floors)?;
        if eggs <= 1 || floors <= 1 {
            return Ok(1);
        }

        self.ensure(eggs, floors);
        let table = &self.table;
        let offset = (1..=floors)
            .min_by_key(|&offset| drop_cost(table, eggs, floors, offset))
            .unwrap_or(1);
        Ok(to_u32(offset))
    }

    /// Absolute floor the player should try next.
    ///
    /// `floors_remaining` counts the untested floors above `last_safe_floor`.
    pub fn suggested_floor(
        &mut self,
        eggs_left: u32,
        floors_remaining: u32,
        last_safe_floor: u32,
    ) -> Result<u32, InvalidArgument> {
        let offset = self.optimal_offset(eggs_left, floors_remaining)?;
        Ok(last_safe_floor.saturating_add(offset))
    }

    /// Worst-case drop count when the next drop is taken at relative floor `offset`.
    ///
    /// Substituting [`Self::optimal_offset`] reproduces [`Self::min_drops`].
    /// Returns `u32::MAX` when the choice cannot guarantee an answer, such as
    /// skipping floors with a single egg.
    pub fn drop_cost(
        &mut self,
        eggs: u32,
        floors: u32,
        offset: u32,
    ) -> Result<u32, InvalidArgument> {
        let (eggs, floors) = validate(eggs, floors)?;
        if offset == 0 || offset as usize > floors {
            return Err(InvalidArgument::FloorOutOfRange {
                floor: offset,
                lowest: 1,
                highest: to_u32(floors),
            });
        }

        let eggs = eggs.max(1);
        self.ensure(eggs, floors);
        Ok(drop_cost(&self.table, eggs, floors, offset as usize))
    }

    /// Largest `(eggs, floors)` pair currently held in the cache.
    #[must_use]
    pub fn cached_extent(&self) -> Option<(u32, u32)> {
        let columns = self.table.first()?.len();
        Some((to_u32(self.table.len() - 1), to_u32(columns - 1)))
    }

    fn ensure(&mut self, eggs: usize, floors: usize) {
        let rows = self.table.len().max(eggs + 1);
        let columns = self.table.first().map_or(0, Vec::len).max(floors + 1);
        if rows == self.table.len() && self.table.iter().all(|row| row.len() == columns) {
            return;
        }

        trace!(eggs, floors, rows, columns, "extending drop table");
        extend(&mut self.table, rows, columns);
    }
}

/// Tabulates a fresh `(eggs + 1) x (floors + 1)` drop table without caching.
///
/// Row zero holds `u32::MAX` for every non-empty floor range; it only feeds
/// the recurrence and is never a meaningful answer.
#[must_use]
pub fn tabulate(eggs: u32, floors: u32) -> Vec<Vec<u32>> {
    let mut table = Vec::new();
    extend(&mut table, eggs as usize + 1, floors as usize + 1);
    table
}

fn validate(eggs: u32, floors: u32) -> Result<(usize, usize), InvalidArgument> {
    if eggs > MAX_EGGS {
        return Err(InvalidArgument::EggsOutOfRange { eggs });
    }
    if floors > MAX_FLOORS {
        return Err(InvalidArgument::FloorsOutOfRange { floors });
    }
    Ok((eggs as usize, floors as usize))
}

fn extend(table: &mut Vec<Vec<u32>>, rows: usize, columns: usize) {
    table.resize_with(rows, Vec::new);
    for eggs in 0..rows {
        let start = table[eggs].len();
        for floors in start..columns {
            let value = cell(table, eggs, floors);
            table[eggs].push(value);
        }
    }
}

fn cell(table: &[Vec<u32>], eggs: usize, floors: usize) -> u32 {
    match (eggs, floors) {
        (_, 0) => 0,
        (0, _) => UNSOLVABLE,
        (_, 1) => 1,
        (1, floors) => to_u32(floors),
        (eggs, floors) => (1..=floors)
            .map(|offset| drop_cost(table, eggs, floors, offset))
            .min()
            .unwrap_or(UNSOLVABLE),
    }
}

// Requires row `eggs - 1` to cover `offset - 1` and row `eggs` to cover `floors - offset`.
fn drop_cost(table: &[Vec<u32>], eggs: usize, floors: usize, offset: usize) -> u32 {
    let broke = table[eggs - 1][offset - 1];
    let survived = table[eggs][floors - offset];
    broke.max(survived).saturating_add(1)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_engine_has_no_extent() {
        assert_eq!(StrategyEngine::new().cached_extent(), None);
    }

    #[test]
    fn extent_grows_but_never_shrinks() {
        let mut engine = StrategyEngine::new();
        assert_eq!(engine.min_drops(2, 100), Ok(14));
        assert_eq!(engine.cached_extent(), Some((2, 100)));

        assert_eq!(engine.min_drops(1, 10), Ok(10));
        assert_eq!(engine.cached_extent(), Some((2, 100)));

        assert_eq!(engine.min_drops(3, 20), Ok(5));
        assert_eq!(engine.cached_extent(), Some((3, 100)));
    }

    #[test]
    fn zero_egg_row_is_unsolvable() {
        let table = tabulate(2, 3);
        assert_eq!(table[0], vec![0, UNSOLVABLE, UNSOLVABLE, UNSOLVABLE]);
        assert_eq!(table[1], vec![0, 1, 2, 3]);
        assert_eq!(table[2], vec![0, 1, 2, 2]);
    }

    #[test]
    fn incremental_growth_matches_fresh_table() {
        let mut engine = StrategyEngine::new();
        let _ = engine.min_drops(2, 10);
        let _ = engine.min_drops(4, 3);
        let _ = engine.min_drops(3, 40);
        assert_eq!(engine.table, tabulate(4, 40));
    }
}
