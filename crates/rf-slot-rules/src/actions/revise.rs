//! Grid revision before evaluation: planting extra symbols and removing
//! duplicates within a reel.

use rand::Rng;

use super::ActionContext;
use crate::events::SpinEvent;
use crate::state::{SpinState, test_chance2};
use crate::symbols::SymbolId;
use crate::weighting::{WeightedGenerator, Weighting};

/// Search attempts per placement when the chance is below certain
const GENERATE_ATTEMPTS: usize = 35;
/// Redraws per duplicate before the tile is left as is
const DEDUPE_REDRAWS: usize = 16;

pub(super) struct Generate<'a> {
    pub symbol: SymbolId,
    /// Chance (percent) of each successive placement; the first miss stops
    pub chances: &'a [f64],
    pub reels: &'a [usize],
    /// Allow more than one instance per reel
    pub allow_dupes: bool,
    /// Generate even when the symbol already landed
    pub allow_old: bool,
    pub multipliers: Option<&'a Weighting>,
}

pub(super) fn generate(state: &mut SpinState, ctx: &mut ActionContext<'_>, params: Generate<'_>) -> bool {
    let grid = state.grid_arc();
    if state.sticky_count() as usize > grid.valid_count() / 2 {
        return false;
    }
    let symbol = params.symbol;
    if !params.allow_old
        && grid
            .valid_offsets()
            .any(|o| state.indexes[o] == symbol && !state.sticky[o])
    {
        return false;
    }

    let fits = |state: &SpinState, offset: usize| {
        if !grid.is_valid_offset(offset) || state.sticky[offset] || state.indexes[offset] == symbol {
            return false;
        }
        let reel = grid.reel_row(offset).0;
        if !params.reels.is_empty() && !params.reels.contains(&reel) {
            return false;
        }
        params.allow_dupes || state.count_symbol_in_reels(symbol, &[reel]) == 0
    };

    let mut tiles = Vec::new();
    for &chance in params.chances {
        if !test_chance2(ctx.rng(), chance) {
            break;
        }
        let attempts = if chance < 100.0 { GENERATE_ATTEMPTS } else { grid.size() };
        let mut offset = ctx.rng().random_range(0..grid.size());
        let mut found = None;
        for _ in 0..attempts {
            if fits(state, offset) {
                found = Some(offset);
                break;
            }
            offset = grid.next_offset(offset);
        }
        let Some(offset) = found else {
            break;
        };

        state.indexes[offset] = symbol;
        if let Some(weights) = params.multipliers {
            let multiplier = weights.random_index(ctx.rng());
            if multiplier > 1 {
                state.ensure_multipliers()[offset] = multiplier;
            }
        }
        tiles.push(offset);
    }

    if tiles.is_empty() {
        return false;
    }
    state.count_specials();
    log::debug!("Generated {} x{}", symbol, tiles.len());
    ctx.record(SpinEvent::GridRevised { symbol, tiles });
    true
}

/// Keep the first `symbol` of each reel and redraw the rest from `replacements`
pub(super) fn dedupe(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: SymbolId,
    reels: &[usize],
    replacements: &Weighting,
) -> bool {
    let grid = state.grid_arc();
    let mut tiles = Vec::new();

    for reel in 0..grid.reels() {
        if !reels.is_empty() && !reels.contains(&reel) {
            continue;
        }
        let mut seen = false;
        for offset in grid.reel_offsets(reel) {
            if state.indexes[offset] != symbol {
                continue;
            }
            if !seen {
                seen = true;
                continue;
            }
            if state.sticky[offset] {
                continue;
            }

            let redraw = (0..DEDUPE_REDRAWS)
                .map(|_| replacements.random_index(ctx.rng()) as SymbolId)
                .find(|&id| id != symbol);
            match redraw {
                Some(id) => {
                    state.indexes[offset] = id;
                    tiles.push(offset);
                }
                None => log::warn!("No replacement for duplicate {} at tile {}", symbol, offset),
            }
        }
    }

    if tiles.is_empty() {
        return false;
    }
    state.count_specials();
    ctx.record(SpinEvent::GridRevised { symbol, tiles });
    true
}
