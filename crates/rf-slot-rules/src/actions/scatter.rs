//! Scatter payouts, free spin awards and the bonus symbol

use super::ActionContext;
use crate::evaluator::{mark_tiles, scatter};
use crate::events::SpinEvent;
use crate::payout::{Payout, PayoutKind};
use crate::state::SpinState;
use crate::symbols::SymbolId;
use crate::weighting::{WeightedGenerator, Weighting};

/// Fixed payout when at least `count` scatters landed this spin
pub(super) fn fixed_payout(state: &mut SpinState, symbol: SymbolId, count: u8, factor: f64) -> Option<Payout> {
    if state.new_scatters < count {
        return None;
    }
    let found = scatter::count(state, &[symbol]);
    if found.count < count {
        return None;
    }

    mark_tiles(state, &found.tiles);
    Some(
        Payout::new(PayoutKind::Scatter, symbol, found.count, factor, state.round_multiplier(0))
            .with_tiles(found.tiles),
    )
}

/// Test for a free spin award; optionally draws the round bonus symbol
pub(super) fn free_spins(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: SymbolId,
    count: u8,
    extra: &[SymbolId],
    bonus_symbols: Option<&Weighting>,
) -> bool {
    if state.new_scatters < count {
        return false;
    }
    if state.count_symbol(symbol).saturating_add(state.count_symbols(extra)) < count {
        return false;
    }

    if let Some(weights) = bonus_symbols {
        let bonus = weights.random_index(ctx.rng()) as SymbolId;
        state.bonus_symbol = Some(bonus);
        log::debug!("Bonus symbol {} selected", bonus);
    }
    true
}

/// Pay the bonus symbol by the number of reels holding it (at least two)
pub(super) fn bonus_payout(state: &mut SpinState, lines: u8) -> Option<Payout> {
    let bonus = state.bonus_symbol?;
    let reels = state.bonus_reels();
    if reels.len() < 2 {
        return None;
    }
    let factor = state.symbols().get(bonus)?.payout(reels.len() as u8);
    if factor <= 0.0 {
        return None;
    }

    let tiles: Vec<usize> = reels
        .iter()
        .flat_map(|&reel| state.grid().reel_offsets(reel))
        .collect();
    mark_tiles(state, &tiles);
    Some(
        Payout::new(
            PayoutKind::Bonus,
            bonus,
            reels.len() as u8,
            factor * lines as f64,
            state.round_multiplier(0),
        )
        .with_tiles(tiles),
    )
}

pub(super) fn expand_bonus(state: &mut SpinState, ctx: &mut ActionContext<'_>) {
    let Some(symbol) = state.bonus_symbol else {
        return;
    };
    let reels = state.expand_bonus_symbol();
    ctx.record(SpinEvent::Expanded { symbol, reels });
}
