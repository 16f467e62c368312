//! Payout evaluation: paylines, all-paylines, clusters and scatters
//!
//! Every evaluator reads the grid from [`SpinState`], marks the tiles of each
//! win in `state.payouts` and returns plain [`Payout`](crate::payout::Payout)
//! records. Matching itself never draws from the generator.
//!
//! ## Architecture
//!
//! ```text
//! SpinState ──┬── payline::evaluate(PaylineSet)   fixed lines, LTR/RTL/both
//!             ├── all_paylines::evaluate          every row path, reel 0 onward
//!             ├── cluster::evaluate(min)          flood fill over adjacency
//!             └── scatter::count / payout         position independent
//! ```

pub mod all_paylines;
pub mod cluster;
pub mod payline;
pub mod scatter;

use crate::state::SpinState;

/// Multiplier contributed by one matched tile: wild multiplier × tile multiplier
pub(crate) fn tile_factor(state: &SpinState, offset: usize) -> f64 {
    state.symbols().wild_multiplier(state.indexes[offset]) * state.tile_multiplier(offset)
}

/// Combined multiplier for a set of matched tiles, including the round multiplier
pub(crate) fn combined_multiplier(state: &SpinState, tiles: &[usize]) -> f64 {
    let wilds = tiles
        .iter()
        .filter(|&&o| state.symbols().is_wild(state.indexes[o]))
        .count();
    let product: f64 = tiles.iter().map(|&o| tile_factor(state, o)).product();
    product * state.round_multiplier(wilds)
}

pub(crate) fn mark_tiles(state: &mut SpinState, tiles: &[usize]) {
    for &offset in tiles {
        state.payouts[offset] = state.payouts[offset].saturating_add(1);
    }
}
