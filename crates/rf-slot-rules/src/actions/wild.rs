//! Wild payouts, expansion, transforms and jumps

use rf_slot_grid::Shape;

use super::ActionContext;
use crate::evaluator::mark_tiles;
use crate::events::SpinEvent;
use crate::payout::{Payout, PayoutKind};
use crate::state::SpinState;
use crate::symbols::SymbolId;
use crate::wilds::{self, JumpParams};

pub(super) fn fixed_payout(state: &mut SpinState, symbol: SymbolId, count: u8, factor: f64) -> Option<Payout> {
    let tiles: Vec<usize> = state
        .grid()
        .valid_offsets()
        .filter(|&o| state.indexes[o] == symbol)
        .collect();
    if tiles.is_empty() || tiles.len() < count as usize {
        return None;
    }

    mark_tiles(state, &tiles);
    Some(
        Payout::new(PayoutKind::Wild, symbol, tiles.len() as u8, factor, state.round_multiplier(0))
            .with_tiles(tiles),
    )
}

fn enough_wilds(state: &SpinState, symbol: SymbolId, count: u8) -> bool {
    state.new_wilds >= count && state.count_symbol(symbol) >= count
}

pub(super) fn expansion(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: SymbolId,
    count: u8,
    need_hero: bool,
    lock: bool,
) -> bool {
    if !enough_wilds(state, symbol, count) || (need_hero && state.new_heroes == 0) {
        return false;
    }
    let reels = wilds::expand_reels(state, symbol, lock);
    if reels.is_empty() {
        return false;
    }
    ctx.record(SpinEvent::Expanded { symbol, reels });
    true
}

/// Transform around each wild using the round's sticky symbol
pub(super) fn transform(state: &mut SpinState, ctx: &mut ActionContext<'_>, symbol: SymbolId, shape: &Shape) -> bool {
    let Some(substitute) = state.sticky_symbol else {
        return false;
    };
    if !enough_wilds(state, symbol, 1) {
        return false;
    }
    let tiles = wilds::transform_shape(state, symbol, substitute, shape);
    if tiles == 0 {
        return false;
    }
    ctx.record(SpinEvent::Transformed {
        trigger: symbol,
        substitute,
        tiles,
    });
    true
}

pub(super) fn jumping(state: &mut SpinState, ctx: &mut ActionContext<'_>, params: &JumpParams) -> bool {
    if state.count_symbols(params.symbols()) == 0 {
        return false;
    }
    let jumps = wilds::jump(state, params, ctx.rng());
    if jumps.is_empty() {
        return false;
    }
    if params.needs_refill() {
        ctx.request_refill();
    }
    ctx.record(SpinEvent::Jumped { jumps });
    true
}
