//! Per-round mutable spin state
//!
//! A [`SpinState`] is owned by exactly one round. Free spins and refills reuse
//! the same state sequentially; the topology and symbol set are shared
//! read-only through `Arc`.

use std::sync::Arc;

use rand::{Rng, RngCore};
use rf_slot_grid::GridTopology;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::spinner::Spinner;
use crate::symbols::{EMPTY, SymbolId, SymbolSet};

/// Number of round flag registers
pub const ROUND_FLAGS: usize = 16;

/// Effect mark for a tile rewritten by a shape transform
pub const TRANSFORM_EFFECT: u8 = 1;
/// Effect mark for a tile cleared by an exploding bomb
pub const BOMB_EFFECT: u8 = 2;

/// What produced the current grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpinKind {
    /// First spin of a round
    #[default]
    First,
    /// Awarded free spin
    Free,
    /// Cascade/clearance refill
    Refill,
    /// Refill around a super shape
    Super,
}

/// Where a jumping symbol went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpMark {
    To(usize),
    OffGrid,
}

/// Mutable data for one spin round
#[derive(Debug, Clone)]
pub struct SpinState {
    grid: Arc<GridTopology>,
    symbols: Arc<SymbolSet>,
    multiplier_needs_wild: bool,

    pub kind: SpinKind,
    /// Symbol per tile (0 = empty)
    pub indexes: Vec<SymbolId>,
    pub sticky: Vec<bool>,
    /// Tiles of a detected super shape
    pub super_shape: Vec<bool>,
    /// Per-reel lock (expanded wild reels)
    pub locked: Vec<bool>,
    /// Per-reel hot flag; hot reels count as holding the bonus symbol
    pub hot: Vec<bool>,
    /// Optional per-tile multipliers (0 = none)
    pub multipliers: Option<Vec<u16>>,
    /// Payout marks: number of payouts each tile takes part in
    pub payouts: Vec<u8>,
    /// Special effect marks (transforms, explosions)
    pub effects: Vec<u8>,
    pub jumps: Vec<Option<JumpMark>>,
    /// Injected symbol per tile (0 = none)
    pub injections: Vec<SymbolId>,
    pub round_flags: [i32; ROUND_FLAGS],
    pub progress_level: usize,
    /// Round multiplier
    pub multiplier: f64,
    pub super_symbol: Option<SymbolId>,
    pub sticky_symbol: Option<SymbolId>,
    pub bonus_symbol: Option<SymbolId>,
    /// Wilds landed on unlocked reels this spin
    pub new_wilds: u8,
    pub new_heroes: u8,
    pub new_scatters: u8,
    /// Remaining free spins
    pub free_spins: u32,
    /// Spins performed in this round
    pub spin_seq: u64,
}

impl SpinState {
    pub fn new(grid: Arc<GridTopology>, symbols: Arc<SymbolSet>) -> Self {
        let size = grid.size();
        let reels = grid.reels();
        Self {
            grid,
            symbols,
            multiplier_needs_wild: false,
            kind: SpinKind::First,
            indexes: vec![EMPTY; size],
            sticky: vec![false; size],
            super_shape: vec![false; size],
            locked: vec![false; reels],
            hot: vec![false; reels],
            multipliers: None,
            payouts: vec![0; size],
            effects: vec![0; size],
            jumps: vec![None; size],
            injections: vec![EMPTY; size],
            round_flags: [0; ROUND_FLAGS],
            progress_level: 0,
            multiplier: 1.0,
            super_symbol: None,
            sticky_symbol: None,
            bonus_symbol: None,
            new_wilds: 0,
            new_heroes: 0,
            new_scatters: 0,
            free_spins: 0,
            spin_seq: 0,
        }
    }

    pub fn with_multiplier_needs_wild(mut self, needs_wild: bool) -> Self {
        self.multiplier_needs_wild = needs_wild;
        self
    }

    pub fn grid(&self) -> &GridTopology {
        &self.grid
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Shared handle to the topology
    pub fn grid_arc(&self) -> Arc<GridTopology> {
        Arc::clone(&self.grid)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Replace the grid with fixed symbols (debug grids, tests, replays).
    ///
    /// Offsets outside the mask are forced empty.
    pub fn load(&mut self, indexes: &[SymbolId]) -> Result<()> {
        if indexes.len() != self.indexes.len() {
            return Err(ConfigError::GridLength {
                expected: self.indexes.len(),
                got: indexes.len(),
            });
        }
        for (offset, &id) in indexes.iter().enumerate() {
            if id != EMPTY && self.grid.is_valid_offset(offset) && !self.symbols.contains(id) {
                return Err(ConfigError::UnknownSymbol(id));
            }
        }

        self.begin_spin();
        for (offset, &id) in indexes.iter().enumerate() {
            self.indexes[offset] = if self.grid.is_valid_offset(offset) { id } else { EMPTY };
        }
        self.count_specials();
        Ok(())
    }

    /// Spin the reels. Locked reels keep their symbols; with sticky tiles
    /// present only the non-sticky tiles are redrawn.
    pub fn spin(&mut self, spinner: &dyn Spinner, rng: &mut dyn RngCore) {
        self.begin_spin();

        if self.has_sticky() {
            self.clear_non_sticky();
            self.fill_empty(spinner, rng);
        } else {
            for reel in 0..self.grid.reels() {
                if self.locked[reel] {
                    continue;
                }
                for offset in self.grid.reel_offsets(reel) {
                    self.indexes[offset] = spinner.symbol_for(reel, rng);
                    if let Some(multipliers) = self.multipliers.as_mut() {
                        multipliers[offset] = 0;
                    }
                }
            }
        }

        self.count_specials();
        log::trace!("Spin {} ({:?}): {:?}", self.spin_seq, self.kind, self.indexes);
    }

    /// Fill every empty valid tile; returns the filled offsets
    pub fn fill_empty(&mut self, spinner: &dyn Spinner, rng: &mut dyn RngCore) -> Vec<usize> {
        let mut filled = Vec::new();
        for reel in 0..self.grid.reels() {
            for offset in self.grid.reel_offsets(reel) {
                if self.indexes[offset] == EMPTY {
                    self.indexes[offset] = spinner.symbol_for(reel, rng);
                    filled.push(offset);
                }
            }
        }
        filled
    }

    /// Reset the per-spin marks and advance the spin counter
    pub(crate) fn begin_spin(&mut self) {
        self.spin_seq += 1;
        self.reset_payouts();
        self.reset_effects();
        self.jumps.fill(None);
        self.injections.fill(EMPTY);
    }

    /// Count wild, hero and scatter symbols on the unlocked reels
    pub fn count_specials(&mut self) {
        let (mut wilds, mut heroes, mut scatters) = (0u8, 0u8, 0u8);
        for reel in 0..self.grid.reels() {
            if self.locked[reel] {
                continue;
            }
            for offset in self.grid.reel_offsets(reel) {
                if let Some(symbol) = self.symbols.get(self.indexes[offset]) {
                    wilds += symbol.is_wild() as u8;
                    scatters += symbol.is_scatter() as u8;
                    heroes += symbol.kind.is_hero() as u8;
                }
            }
        }
        self.new_wilds = wilds;
        self.new_heroes = heroes;
        self.new_scatters = scatters;
    }

    /// Reset everything carried across a round
    pub fn reset_round(&mut self) {
        self.kind = SpinKind::First;
        self.super_symbol = None;
        self.sticky_symbol = None;
        self.bonus_symbol = None;
        self.free_spins = 0;
        self.spin_seq = 0;
        self.progress_level = 0;
        self.multiplier = 1.0;
        self.locked.fill(false);
        self.hot.fill(false);
        self.reset_sticky();
        self.reset_effects();
        self.reset_payouts();
        self.multipliers = None;
        self.round_flags = [0; ROUND_FLAGS];
    }

    pub fn reset_payouts(&mut self) {
        self.payouts.fill(0);
    }

    pub fn reset_effects(&mut self) {
        self.effects.fill(0);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COUNTING
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn count_symbol(&self, symbol: SymbolId) -> u8 {
        self.indexes.iter().filter(|&&id| id == symbol).count() as u8
    }

    pub fn count_symbols(&self, symbols: &[SymbolId]) -> u8 {
        symbols.iter().map(|&s| self.count_symbol(s)).sum()
    }

    /// Count a symbol on the given (0-based) reels
    pub fn count_symbol_in_reels(&self, symbol: SymbolId, reels: &[usize]) -> u8 {
        reels
            .iter()
            .filter(|&&reel| reel < self.grid.reels())
            .flat_map(|&reel| self.grid.reel_offsets(reel))
            .filter(|&offset| self.indexes[offset] == symbol)
            .count() as u8
    }

    /// Reels holding the round bonus symbol; hot reels always count
    pub fn bonus_reels(&self) -> Vec<usize> {
        let Some(bonus) = self.bonus_symbol else {
            return Vec::new();
        };
        (0..self.grid.reels())
            .filter(|&reel| {
                self.hot[reel]
                    || self
                        .grid
                        .reel_offsets(reel)
                        .any(|offset| self.indexes[offset] == bonus)
            })
            .collect()
    }

    /// Number of reels holding the round bonus symbol (hot reels included)
    pub fn count_bonus_symbol(&self) -> u8 {
        self.bonus_reels().len() as u8
    }

    /// Fill every reel holding the bonus symbol with it; returns the reels expanded
    pub fn expand_bonus_symbol(&mut self) -> Vec<usize> {
        let Some(bonus) = self.bonus_symbol else {
            return Vec::new();
        };
        let reels = self.bonus_reels();
        for &reel in &reels {
            for offset in self.grid.reel_offsets(reel) {
                self.indexes[offset] = bonus;
            }
        }
        reels
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REELS & STICKINESS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn lock_reels(&mut self, reels: &[usize]) {
        for &reel in reels {
            if let Some(lock) = self.locked.get_mut(reel) {
                *lock = true;
            }
        }
    }

    pub fn is_locked(&self, reel: usize) -> bool {
        self.locked.get(reel).copied().unwrap_or(false)
    }

    pub fn mark_hot(&mut self, reel: usize) {
        if let Some(hot) = self.hot.get_mut(reel) {
            *hot = true;
        }
    }

    pub fn reset_sticky(&mut self) {
        self.sticky.fill(false);
        self.super_shape.fill(false);
        self.sticky_symbol = None;
    }

    pub fn has_sticky(&self) -> bool {
        self.sticky.iter().any(|&s| s)
    }

    pub fn sticky_count(&self) -> u8 {
        self.sticky.iter().filter(|&&s| s).count() as u8
    }

    /// Empty every non-sticky tile (and its multiplier)
    pub fn clear_non_sticky(&mut self) {
        for offset in 0..self.indexes.len() {
            if !self.sticky[offset] {
                self.indexes[offset] = EMPTY;
                if let Some(multipliers) = self.multipliers.as_mut() {
                    multipliers[offset] = 0;
                }
            }
        }
    }

    /// Overwrite a tile
    pub fn set_tile(&mut self, offset: usize, symbol: SymbolId, sticky: bool, multiplier: u16) {
        self.indexes[offset] = symbol;
        self.sticky[offset] = sticky;
        if multiplier > 0 || self.multipliers.is_some() {
            self.ensure_multipliers()[offset] = multiplier;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MULTIPLIERS & FLAGS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Per-tile multipliers, created on first use
    pub fn ensure_multipliers(&mut self) -> &mut Vec<u16> {
        let size = self.indexes.len();
        self.multipliers.get_or_insert_with(|| vec![0; size])
    }

    /// Tile multiplier, 1.0 when none is set
    pub fn tile_multiplier(&self, offset: usize) -> f64 {
        match self.multipliers.as_ref().and_then(|m| m.get(offset)) {
            Some(&m) if m > 1 => m as f64,
            _ => 1.0,
        }
    }

    /// Round multiplier for a win containing `wilds` wild tiles
    pub fn round_multiplier(&self, wilds: usize) -> f64 {
        if self.multiplier_needs_wild && wilds == 0 {
            return 1.0;
        }
        self.multiplier
    }

    pub fn round_flag(&self, flag: usize) -> i32 {
        self.round_flags.get(flag).copied().unwrap_or(0)
    }

    pub fn set_round_flag(&mut self, flag: usize, value: i32) {
        if let Some(slot) = self.round_flags.get_mut(flag) {
            *slot = value;
        }
    }
}

/// Chance test with two decimals of precision; above 99.99 it always passes
/// without consuming the generator.
pub fn test_chance2(rng: &mut dyn RngCore, chance: f64) -> bool {
    if chance > 99.99 {
        return true;
    }
    (rng.random_range(0..10_000u32) as f64) < chance * 100.0
}

/// Chance test with four decimals of precision; above 99.9999 it always passes.
pub fn test_chance4(rng: &mut dyn RngCore, chance: f64) -> bool {
    if chance > 99.9999 {
        return true;
    }
    (rng.random_range(0..1_000_000u32) as f64) < chance * 10_000.0
}
