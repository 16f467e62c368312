//! Round flags: small integer slots carried across the spins of a round

use super::ActionContext;
use crate::events::SpinEvent;
use crate::state::SpinState;
use crate::symbols::SymbolId;
use crate::weighting::{WeightedGenerator, Weighting};

fn change(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize, value: i32) -> bool {
    state.set_round_flag(flag, value);
    ctx.record(SpinEvent::RoundFlagChanged { flag, value });
    true
}

pub(super) fn draw(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize, weights: &Weighting) -> bool {
    let value = weights.random_index(ctx.rng()) as i32;
    log::debug!("Round flag {} drawn: {}", flag, value);
    change(state, ctx, flag, value)
}

pub(super) fn increase(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize) -> bool {
    let value = state.round_flag(flag) + 1;
    change(state, ctx, flag, value)
}

/// Decrease a positive flag; zero stays zero
pub(super) fn decrease(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize) -> bool {
    let value = state.round_flag(flag);
    if value <= 0 {
        return false;
    }
    change(state, ctx, flag, value - 1)
}

pub(super) fn set(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize, value: i32) -> bool {
    change(state, ctx, flag, value)
}

/// Set the flag to 1 once `symbol` lands
pub(super) fn symbol_used(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize, symbol: SymbolId) -> bool {
    if state.count_symbol(symbol) == 0 {
        return false;
    }
    change(state, ctx, flag, 1)
}

/// Record the first count of `symbol`; later counts leave the flag alone
pub(super) fn symbol_count(state: &mut SpinState, ctx: &mut ActionContext<'_>, flag: usize, symbol: SymbolId) -> bool {
    let count = state.count_symbol(symbol);
    if count == 0 || state.round_flag(flag) != 0 {
        return false;
    }
    change(state, ctx, flag, count as i32)
}

pub(super) fn reset(state: &mut SpinState, ctx: &mut ActionContext<'_>, flags: &[usize]) -> bool {
    let mut changed = false;
    for &flag in flags {
        if state.round_flag(flag) != 0 {
            changed |= change(state, ctx, flag, 0);
        }
    }
    changed
}
