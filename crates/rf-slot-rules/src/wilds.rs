//! Wild engine: reel expansion, shape transforms and jumping symbols
//!
//! ## Architecture
//!
//! ```text
//! expand_reels       unlocked reel holding the wild → whole reel wild (+ lock)
//! transform_shape    shape around each trigger → substitute symbol
//! jump               plan every jump first, then execute in tile order
//!                    ├── off grid (edge tiles, chance)
//!                    ├── onto empty tiles, or onto symbols
//!                    └── clone (origin keeps its symbol)
//! ```

use rand::{Rng, RngCore};
use rf_slot_grid::{Direction, GridTopology, Shape};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ConfigError, Result};
use crate::state::{JumpMark, SpinState, TRANSFORM_EFFECT, test_chance2};
use crate::symbols::{EMPTY, SymbolId};

/// Longest allowed jump
pub const MAX_JUMP: u8 = 4;

// ═══════════════════════════════════════════════════════════════════════════════
// EXPANSION & TRANSFORM
// ═══════════════════════════════════════════════════════════════════════════════

/// Fill every unlocked reel holding `symbol` with it; optionally lock those
/// reels for the rest of the round. Returns the expanded reels.
pub fn expand_reels(state: &mut SpinState, symbol: SymbolId, lock: bool) -> Vec<usize> {
    let grid = state.grid_arc();
    let mut expanded = Vec::new();

    for reel in 0..grid.reels() {
        if state.is_locked(reel) {
            continue;
        }
        let offsets = grid.reel_offsets(reel);
        if !offsets.clone().any(|o| state.indexes[o] == symbol) {
            continue;
        }
        for offset in offsets {
            state.indexes[offset] = symbol;
        }
        if lock {
            state.locked[reel] = true;
        }
        expanded.push(reel);
    }

    if !expanded.is_empty() {
        log::debug!("Expanded symbol {} on reels {:?}", symbol, expanded);
    }
    expanded
}

/// Overwrite the shape around every `trigger` tile on an unlocked reel with
/// `substitute`. Other trigger tiles inside a shape are left alone; the
/// center itself is always replaced when the shape covers it. Returns the
/// number of distinct tiles written.
pub fn transform_shape(state: &mut SpinState, trigger: SymbolId, substitute: SymbolId, shape: &Shape) -> usize {
    let grid = state.grid_arc();
    let centers: Vec<usize> = grid
        .valid_offsets()
        .filter(|&o| state.indexes[o] == trigger && !state.is_locked(grid.reel_row(o).0))
        .collect();

    let mut written = vec![false; grid.size()];
    for &center in &centers {
        for offset in shape.place_clipped(&grid, center) {
            if offset != center && state.indexes[offset] == trigger {
                continue;
            }
            state.indexes[offset] = substitute;
            state.effects[offset] = TRANSFORM_EFFECT;
            written[offset] = true;
        }
    }

    let count = written.iter().filter(|&&w| w).count();
    if count > 0 {
        log::debug!(
            "Transformed {} tiles around {} trigger(s) into {}",
            count,
            centers.len(),
            substitute
        );
    }
    count
}

// ═══════════════════════════════════════════════════════════════════════════════
// JUMPING
// ═══════════════════════════════════════════════════════════════════════════════

/// Validated jump configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpParams {
    direction: Direction,
    symbols: Vec<SymbolId>,
    min_jump: u8,
    max_jump: u8,
    on_symbols: bool,
    off_grid: f64,
    clone: bool,
}

impl JumpParams {
    /// Jump one tile in `direction` (a compass direction or a category)
    pub fn new(direction: Direction, symbols: Vec<SymbolId>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(ConfigError::InvalidJump("no jumping symbols"));
        }
        if direction == Direction::Center {
            return Err(ConfigError::InvalidJump("direction cannot be center"));
        }
        Ok(Self {
            direction,
            symbols,
            min_jump: 1,
            max_jump: 1,
            on_symbols: false,
            off_grid: 0.0,
            clone: false,
        })
    }

    /// Jump distance range. A minimum of 0 allows jumping in place.
    pub fn with_jump_size(mut self, min: u8, max: u8) -> Result<Self> {
        if min > MAX_JUMP || max > MAX_JUMP {
            return Err(ConfigError::InvalidJump("jump size above 4"));
        }
        if max < min {
            return Err(ConfigError::InvalidJump("maximum jump below minimum"));
        }
        if min == 0 && max == 0 {
            return Err(ConfigError::InvalidJump("jump size cannot be zero"));
        }
        self.min_jump = min;
        self.max_jump = max;
        Ok(self)
    }

    /// Allow landing on (and consuming) other symbols; vacated tiles need a refill
    pub fn with_on_symbols(mut self) -> Self {
        self.on_symbols = true;
        self
    }

    /// Chance (percent) for a symbol on the grid edge to jump off the grid
    pub fn with_off_grid(mut self, chance: f64) -> Self {
        self.off_grid = chance.clamp(0.0, 100.0);
        self
    }

    /// Leave a copy behind on the origin tile
    pub fn with_clone(mut self) -> Self {
        self.clone = true;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn jump_size(&self) -> (u8, u8) {
        (self.min_jump, self.max_jump)
    }

    /// True if vacated origins must be refilled after jumping
    pub fn needs_refill(&self) -> bool {
        self.on_symbols && !self.clone
    }
}

/// One executed jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpRecord {
    pub from: usize,
    pub to: JumpMark,
    /// Compass direction of the jump; `Center` for in-place and off-grid jumps
    pub direction: Direction,
    pub cloned: bool,
}

/// Jump every matching symbol. Targets are chosen before anything moves, and
/// two symbols never land on the same tile. A symbol without a legal target
/// stays where it is.
pub fn jump(state: &mut SpinState, params: &JumpParams, rng: &mut dyn RngCore) -> Vec<JumpRecord> {
    let grid = state.grid_arc();
    let mut planned: Vec<JumpRecord> = Vec::new();

    for from in grid.valid_offsets() {
        if !params.symbols.contains(&state.indexes[from]) {
            continue;
        }

        if params.off_grid > 0.0 && grid.is_on_edge(from) && test_chance2(rng, params.off_grid) {
            planned.push(JumpRecord {
                from,
                to: JumpMark::OffGrid,
                direction: Direction::Center,
                cloned: params.clone,
            });
            continue;
        }

        let candidates: SmallVec<[(usize, Direction); 32]> = targets(&grid, from, params)
            .into_iter()
            .filter(|&(to, _)| {
                let tile = state.indexes[to];
                let free = to == from
                    || tile == EMPTY
                    || (params.on_symbols && !params.symbols.contains(&tile));
                free && !planned.iter().any(|j| j.to == JumpMark::To(to))
            })
            .collect();

        let pick = match candidates.len() {
            0 => continue,
            1 => 0,
            n => rng.random_range(0..n),
        };
        let (to, direction) = candidates[pick];
        planned.push(JumpRecord {
            from,
            to: JumpMark::To(to),
            direction,
            cloned: params.clone,
        });
    }

    for record in &planned {
        execute(state, record);
    }

    if !planned.is_empty() {
        log::debug!("{} symbol(s) jumped", planned.len());
    }
    planned
}

/// Tiles reachable by repeating one compass step `min..=max` times
fn targets(grid: &GridTopology, from: usize, params: &JumpParams) -> SmallVec<[(usize, Direction); 32]> {
    let mut out = SmallVec::new();
    if params.min_jump == 0 {
        out.push((from, Direction::Center));
    }

    for dir in Direction::COMPASS {
        if !params.direction.accepts(dir) {
            continue;
        }
        let mut at = from;
        for step in 1..=params.max_jump {
            let Some(next) = grid.neighbor_towards(at, dir) else {
                break;
            };
            at = next;
            if step >= params.min_jump {
                out.push((at, dir));
            }
        }
    }
    out
}

fn execute(state: &mut SpinState, record: &JumpRecord) {
    let from = record.from;
    match record.to {
        JumpMark::To(to) if to == from => {
            state.jumps[from] = Some(record.to);
            return;
        }
        JumpMark::To(to) => {
            state.indexes[to] = state.indexes[from];
            state.sticky[to] = state.sticky[from];
            if let Some(multipliers) = state.multipliers.as_mut() {
                multipliers[to] = multipliers[from];
            }
        }
        JumpMark::OffGrid => {}
    }
    state.jumps[from] = Some(record.to);

    if !record.cloned {
        state.indexes[from] = EMPTY;
        state.sticky[from] = false;
        if let Some(multipliers) = state.multipliers.as_mut() {
            multipliers[from] = 0;
        }
    }
}
