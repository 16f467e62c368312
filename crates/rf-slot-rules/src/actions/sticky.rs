//! Sticky tile management

use super::{ActionContext, sticky_tiles};
use crate::events::SpinEvent;
use crate::state::SpinState;
use crate::symbols::{SymbolId, SymbolKind};

/// Make every tile holding one of `symbols` sticky; an empty reel filter
/// means all reels. Sticky tiles lose their payout marks.
pub(super) fn sticky_symbols(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbols: &[SymbolId],
    reels: &[usize],
) -> bool {
    let grid = state.grid_arc();
    let tiles: Vec<usize> = grid
        .valid_offsets()
        .filter(|&o| reels.is_empty() || reels.contains(&grid.reel_row(o).0))
        .filter(|&o| symbols.contains(&state.indexes[o]))
        .collect();
    if tiles.is_empty() {
        return false;
    }

    for &offset in &tiles {
        state.sticky[offset] = true;
        state.payouts[offset] = 0;
    }
    ctx.record(SpinEvent::StickyChanged {
        tiles: sticky_tiles(state),
    });
    true
}

/// Make the most frequent standard symbol sticky. Ties go to the highest id.
pub(super) fn best_symbol(state: &mut SpinState, ctx: &mut ActionContext<'_>) -> bool {
    state.reset_sticky();

    let standard: Vec<SymbolId> = state
        .symbols()
        .iter()
        .filter(|s| s.kind == SymbolKind::Standard)
        .map(|s| s.id)
        .collect();

    let mut best: Option<(SymbolId, u8)> = None;
    for &id in standard.iter().rev() {
        let count = state.count_symbol(id);
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((id, count));
        }
    }
    let Some((symbol, count)) = best else {
        return false;
    };

    state.sticky_symbol = Some(symbol);
    for offset in 0..state.indexes.len() {
        if state.indexes[offset] == symbol {
            state.sticky[offset] = true;
        }
    }
    log::debug!("Sticky symbol {} ({} tiles)", symbol, count);
    ctx.record(SpinEvent::StickyChanged {
        tiles: sticky_tiles(state),
    });
    true
}

pub(super) fn reset(state: &mut SpinState, ctx: &mut ActionContext<'_>) -> bool {
    if !state.has_sticky() && state.sticky_symbol.is_none() {
        return false;
    }
    state.reset_sticky();
    ctx.record(SpinEvent::StickyChanged { tiles: Vec::new() });
    true
}
