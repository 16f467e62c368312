//! Position independent scatter counting

use super::{combined_multiplier, mark_tiles, tile_factor};
use crate::payout::{Payout, PayoutKind};
use crate::state::SpinState;
use crate::symbols::SymbolId;

/// Tiles holding any of the counted symbols
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterCount {
    pub count: u8,
    /// Product of the wild and tile multipliers on the counted tiles
    pub multiplier: f64,
    pub tiles: Vec<usize>,
}

/// Count the given symbols anywhere on the grid
pub fn count(state: &SpinState, symbols: &[SymbolId]) -> ScatterCount {
    let tiles: Vec<usize> = state
        .grid()
        .valid_offsets()
        .filter(|&o| symbols.contains(&state.indexes[o]))
        .collect();
    ScatterCount {
        count: tiles.len() as u8,
        multiplier: tiles.iter().map(|&o| tile_factor(state, o)).product(),
        tiles,
    }
}

/// Pay `symbol` from its scatter table when at least `min_count` land
pub fn payout(state: &mut SpinState, symbol: SymbolId, min_count: u8) -> Option<Payout> {
    let found = count(state, &[symbol]);
    if found.count == 0 || found.count < min_count {
        return None;
    }
    let factor = state.symbols().get(symbol)?.scatter_payout(found.count);
    if factor <= 0.0 {
        return None;
    }

    let multiplier = combined_multiplier(state, &found.tiles);
    mark_tiles(state, &found.tiles);
    log::trace!("Scatter {} x{} pays {}", symbol, found.count, factor);
    Some(Payout::new(PayoutKind::Scatter, symbol, found.count, factor, multiplier).with_tiles(found.tiles))
}
