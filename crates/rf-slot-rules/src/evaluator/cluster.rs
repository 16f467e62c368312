//! Cluster matching
//!
//! A cluster is a connected group of one symbol plus any wilds touching it.
//! Rectangular grids connect orthogonally; masked grids connect through every
//! neighbor in the topology. Wilds may take part in several clusters, regular
//! tiles in at most one.

use rf_slot_grid::GridTopology;

use super::{combined_multiplier, mark_tiles};
use crate::payout::{Payout, PayoutKind};
use crate::state::SpinState;
use crate::symbols::SymbolId;

/// Evaluate clusters of at least `min_count` tiles (and at least the
/// symbol's smallest payable count). Tiles are listed in discovery order.
pub fn evaluate(state: &mut SpinState, min_count: u8) -> Vec<Payout> {
    let grid = state.grid_arc();
    let size = grid.size();
    let min_count = min_count.max(state.symbols().min_payout());

    let wilds: Vec<bool> = state
        .indexes
        .iter()
        .map(|&id| state.symbols().is_wild(id))
        .collect();
    let mut claimed = vec![false; size];
    let mut visited = vec![false; size];
    let mut path = Vec::with_capacity(size);
    let mut payouts = Vec::new();

    for start in grid.valid_offsets() {
        if claimed[start] || wilds[start] {
            continue;
        }
        let id = state.indexes[start];
        let Some(symbol) = state.symbols().get(id) else {
            continue;
        };
        let min_payable = symbol.min_payable();
        if min_payable == 0 {
            continue;
        }

        visited.fill(false);
        path.clear();
        visited[start] = true;
        path.push(start);
        let flood = Flood {
            grid: &grid,
            indexes: &state.indexes,
            wilds: &wilds,
            claimed: &claimed,
            symbol: id,
        };
        flood.fill(start, &mut visited, &mut path);

        let count = path.len() as u8;
        if count < min_count || count < min_payable {
            continue;
        }

        let factor = symbol.payout(count);
        let multiplier = combined_multiplier(state, &path);
        for &offset in &path {
            if !wilds[offset] {
                claimed[offset] = true;
            }
        }
        mark_tiles(state, &path);
        log::trace!("Cluster of {} x{} from tile {}", id, count, start);

        payouts.push(
            Payout::new(PayoutKind::Cluster, id, count, factor, multiplier).with_tiles(path.clone()),
        );
    }

    payouts
}

struct Flood<'a> {
    grid: &'a GridTopology,
    indexes: &'a [SymbolId],
    wilds: &'a [bool],
    claimed: &'a [bool],
    symbol: SymbolId,
}

impl Flood<'_> {
    fn fill(&self, from: usize, visited: &mut [bool], path: &mut Vec<usize>) {
        for &(next, dir) in self.grid.neighbors_without_self(from) {
            if !self.grid.has_mask() && dir.is_diagonal() {
                continue;
            }
            if visited[next] {
                continue;
            }
            let joins = self.wilds[next] || (self.indexes[next] == self.symbol && !self.claimed[next]);
            if !joins {
                continue;
            }
            visited[next] = true;
            path.push(next);
            self.fill(next, visited, path);
        }
    }
}
