//! Symbol injection
//!
//! ```text
//! single      random tile, then prime-stride steps until a free tile
//! from_edge   random tile at a fixed distance from the edge (bounded retries)
//! cluster     anchor tile, then breadth-first growth over neighbors
//! ```

use std::collections::VecDeque;

use rand::Rng;

use super::ActionContext;
use crate::events::SpinEvent;
use crate::state::SpinState;
use crate::symbols::{SymbolId, SymbolKind};
use crate::weighting::{WeightedGenerator, Weighting};

/// Random neighbor tries before an occupied anchor falls back to stepping
const ANCHOR_NEIGHBOR_TRIES: usize = 10;
/// Prime-stride tries for a free anchor
const ANCHOR_STEP_TRIES: usize = 50;

fn inject(state: &mut SpinState, ctx: &mut ActionContext<'_>, offset: usize, symbol: SymbolId, multipliers: Option<&Weighting>) {
    state.indexes[offset] = symbol;
    state.injections[offset] = symbol;
    if let Some(weights) = multipliers {
        let multiplier = weights.random_index(ctx.rng());
        if multiplier > 1 {
            state.ensure_multipliers()[offset] = multiplier;
        }
    }
}

fn in_reels(state: &SpinState, offset: usize, reels: &[usize]) -> bool {
    reels.is_empty() || reels.contains(&state.grid().reel_row(offset).0)
}

pub(super) fn single(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: SymbolId,
    reels: &[usize],
    multipliers: Option<&Weighting>,
) -> bool {
    let grid = state.grid_arc();
    let free = |state: &SpinState, o: usize| grid.is_valid_offset(o) && !state.sticky[o] && in_reels(state, o, reels);

    let mut offset = ctx.rng().random_range(0..grid.size());
    let mut found = None;
    for _ in 0..=grid.size() {
        if free(state, offset) {
            found = Some(offset);
            break;
        }
        offset = grid.next_offset(offset);
    }
    let Some(offset) = found else {
        log::warn!("No free tile to inject symbol {}", symbol);
        return false;
    };

    inject(state, ctx, offset, symbol, multipliers);
    state.count_specials();
    ctx.record(SpinEvent::Injected {
        symbol,
        tiles: vec![offset],
    });
    true
}

pub(super) fn from_edge(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: SymbolId,
    steps: u8,
    multipliers: Option<&Weighting>,
) -> bool {
    let grid = state.grid_arc();
    let candidates: Vec<usize> = grid
        .valid_offsets()
        .filter(|&o| grid.steps_to_edge(o) == steps)
        .collect();
    if candidates.is_empty() {
        return false;
    }

    for _ in 0..candidates.len() * 3 {
        let offset = candidates[ctx.rng().random_range(0..candidates.len())];
        if state.sticky[offset] {
            continue;
        }
        inject(state, ctx, offset, symbol, multipliers);
        state.count_specials();
        ctx.record(SpinEvent::Injected {
            symbol,
            tiles: vec![offset],
        });
        return true;
    }

    log::warn!("No free tile {} step(s) from the edge for symbol {}", steps, symbol);
    false
}

pub(super) fn cluster(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: Option<SymbolId>,
    min: u8,
    max: u8,
    anchors: &[usize],
) -> bool {
    let Some(anchor) = find_anchor(state, ctx, anchors) else {
        log::warn!("No free anchor for cluster injection");
        return false;
    };

    let size = ctx.rng().random_range(min..=max.max(min)) as usize;
    let symbol = match symbol {
        Some(symbol) => symbol,
        None => match state.symbols().get(state.indexes[anchor]) {
            Some(s) if s.kind == SymbolKind::Standard => s.id,
            _ => match state.symbols().best_wild(size.min(u8::MAX as usize) as u8) {
                Some((best, _)) => best,
                None => return false,
            },
        },
    };

    let grid = state.grid_arc();
    let mut visited = vec![false; grid.size()];
    let mut queue = VecDeque::from([anchor]);
    visited[anchor] = true;
    let mut tiles = Vec::with_capacity(size);

    while let Some(offset) = queue.pop_front() {
        if tiles.len() >= size {
            break;
        }
        if !state.sticky[offset] {
            inject(state, ctx, offset, symbol, None);
            tiles.push(offset);
        }
        for &(next, _) in grid.neighbors_without_self(offset) {
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    state.count_specials();
    log::debug!("Injected cluster of {} x{} at tile {}", symbol, tiles.len(), anchor);
    ctx.record(SpinEvent::Injected { symbol, tiles });
    true
}

/// A non-sticky anchor: a configured or random tile, else a random
/// neighbor, else the next free tile in stepping order.
fn find_anchor(state: &SpinState, ctx: &mut ActionContext<'_>, anchors: &[usize]) -> Option<usize> {
    let grid = state.grid();
    let start = if anchors.is_empty() {
        let valid: Vec<usize> = grid.valid_offsets().collect();
        valid[ctx.rng().random_range(0..valid.len())]
    } else {
        anchors[ctx.rng().random_range(0..anchors.len())]
    };
    if !state.sticky[start] {
        return Some(start);
    }

    for _ in 0..ANCHOR_NEIGHBOR_TRIES {
        if let Some(next) = grid.random_neighbor(start, ctx.rng()) {
            if !state.sticky[next] {
                return Some(next);
            }
        }
    }

    let mut offset = start;
    for _ in 0..ANCHOR_STEP_TRIES {
        offset = grid.next_offset(offset);
        if !state.sticky[offset] {
            return Some(offset);
        }
    }
    None
}
