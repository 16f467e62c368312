//! Symbol definitions and the symbol set

use rf_slot_grid::MAX_REELS;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Symbol id; 0 marks an empty tile
pub type SymbolId = u8;

/// The empty tile
pub const EMPTY: SymbolId = 0;
/// Highest allowed symbol id
pub const MAX_SYMBOL_ID: SymbolId = 99;

/// Symbol classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Regular paying symbol
    #[default]
    Standard,
    /// Substitutes for other symbols
    Wild,
    /// Regular symbol that can be required alongside wilds to trigger expansions
    Hero,
    /// Pays by count anywhere on the grid
    Scatter,
    /// Explodes and clears its surroundings
    Bomb,
    WildScatter,
    WildBomb,
}

impl SymbolKind {
    pub fn is_wild(self) -> bool {
        matches!(self, Self::Wild | Self::WildScatter | Self::WildBomb)
    }

    pub fn is_scatter(self) -> bool {
        matches!(self, Self::Scatter | Self::WildScatter)
    }

    pub fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb | Self::WildBomb)
    }

    pub fn is_hero(self) -> bool {
        self == Self::Hero
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol id (1..=99)
    pub id: SymbolId,
    /// Display name (e.g. "HP1", "WILD")
    pub name: String,
    pub kind: SymbolKind,
    /// Payline/cluster pays; index 0 = 1 of a kind
    #[serde(default)]
    pub pays: Vec<f64>,
    /// Scatter pays; index 0 = 1 on the grid
    #[serde(default)]
    pub scatter_pays: Vec<f64>,
    /// Multiplier applied to a win this wild takes part in
    #[serde(default = "default_multiplier")]
    pub wild_multiplier: f64,
    /// Split symbol: counts as the given symbol in matches
    #[serde(default)]
    pub wild_for: Option<SymbolId>,
    /// Lands sticky
    #[serde(default)]
    pub sticky: bool,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Symbol {
    pub fn new(id: SymbolId, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            pays: Vec::new(),
            scatter_pays: Vec::new(),
            wild_multiplier: 1.0,
            wild_for: None,
            sticky: false,
        }
    }

    /// Create a regular paying symbol
    pub fn standard(id: SymbolId, name: impl Into<String>, pays: &[f64]) -> Self {
        Self::new(id, name, SymbolKind::Standard).with_pays(pays)
    }

    /// Create a wild symbol
    pub fn wild(id: SymbolId, name: impl Into<String>) -> Self {
        Self::new(id, name, SymbolKind::Wild)
    }

    /// Create a scatter symbol
    pub fn scatter(id: SymbolId, name: impl Into<String>, pays: &[f64]) -> Self {
        Self::new(id, name, SymbolKind::Scatter).with_scatter_pays(pays)
    }

    pub fn with_pays(mut self, pays: &[f64]) -> Self {
        self.pays = pays.to_vec();
        self
    }

    pub fn with_scatter_pays(mut self, pays: &[f64]) -> Self {
        self.scatter_pays = pays.to_vec();
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.wild_multiplier = multiplier;
        self
    }

    pub fn with_wild_for(mut self, symbol: SymbolId) -> Self {
        self.wild_for = Some(symbol);
        self
    }

    pub fn with_sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    pub fn is_wild(&self) -> bool {
        self.kind.is_wild()
    }

    pub fn is_scatter(&self) -> bool {
        self.kind.is_scatter()
    }

    /// Pay for a match of `count` tiles; counts beyond the table use its last entry
    pub fn payout(&self, count: u8) -> f64 {
        pay_at(&self.pays, count)
    }

    /// Pay for `count` scatters on the grid
    pub fn scatter_payout(&self, count: u8) -> f64 {
        pay_at(&self.scatter_pays, count)
    }

    /// Smallest count with a non-zero pay, 0 if the symbol never pays
    pub fn min_payable(&self) -> u8 {
        self.pays
            .iter()
            .position(|&pay| pay > 0.0)
            .map_or(0, |ix| ix as u8 + 1)
    }
}

fn pay_at(pays: &[f64], count: u8) -> f64 {
    if count == 0 || pays.is_empty() {
        return 0.0;
    }
    let ix = (count as usize - 1).min(pays.len() - 1);
    pays[ix]
}

/// Immutable, validated set of symbols
#[derive(Debug, Clone)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
    lookup: Vec<Option<usize>>,
    best_wild: Vec<Option<(SymbolId, f64)>>,
    min_payout: u8,
}

impl SymbolSet {
    /// Validate and index a list of symbols.
    ///
    /// Ids must be unique and within `1..=99`.
    pub fn new(mut symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }
        symbols.sort_by_key(|s| s.id);

        let max_id = symbols.last().map_or(0, |s| s.id);
        let mut lookup = vec![None; max_id as usize + 1];
        for (ix, symbol) in symbols.iter().enumerate() {
            if symbol.id == EMPTY || symbol.id > MAX_SYMBOL_ID {
                return Err(ConfigError::InvalidSymbol(symbol.id));
            }
            if lookup[symbol.id as usize].replace(ix).is_some() {
                return Err(ConfigError::DuplicateSymbol(symbol.id));
            }
        }

        let min_payout = symbols
            .iter()
            .filter(|s| !s.is_scatter())
            .map(Symbol::min_payable)
            .filter(|&n| n > 0)
            .min()
            .unwrap_or(0);

        let mut set = Self {
            symbols,
            lookup,
            best_wild: Vec::new(),
            min_payout,
        };
        set.best_wild = set.compute_best_wild();

        log::debug!(
            "Symbol set: {} symbols, max id {}, min payout {}",
            set.symbols.len(),
            max_id,
            set.min_payout
        );
        Ok(set)
    }

    // Highest id wins ties: ids are scanned downward and only a strictly
    // greater pay replaces the current best.
    fn compute_best_wild(&self) -> Vec<Option<(SymbolId, f64)>> {
        (0..=MAX_REELS as u8)
            .map(|count| {
                if count < 2 {
                    return None;
                }
                let mut best: Option<(SymbolId, f64)> = None;
                for symbol in self.symbols.iter().rev() {
                    if symbol.is_wild() || symbol.is_scatter() {
                        continue;
                    }
                    let pay = symbol.payout(count);
                    if pay > best.map_or(0.0, |(_, p)| p) {
                        best = Some((symbol.id, pay));
                    }
                }
                best
            })
            .collect()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.lookup
            .get(id as usize)
            .copied()
            .flatten()
            .map(|ix| &self.symbols[ix])
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn max_id(&self) -> SymbolId {
        self.symbols.last().map_or(EMPTY, |s| s.id)
    }

    /// Smallest payable count over all non-scatter symbols
    pub fn min_payout(&self) -> u8 {
        self.min_payout
    }

    pub fn is_wild(&self, id: SymbolId) -> bool {
        self.get(id).is_some_and(Symbol::is_wild)
    }

    pub fn is_scatter(&self, id: SymbolId) -> bool {
        self.get(id).is_some_and(Symbol::is_scatter)
    }

    pub fn is_hero(&self, id: SymbolId) -> bool {
        self.get(id).is_some_and(|s| s.kind.is_hero())
    }

    pub fn is_bomb(&self, id: SymbolId) -> bool {
        self.get(id).is_some_and(|s| s.kind.is_bomb())
    }

    /// Wild multiplier of a tile symbol, 1.0 for anything but a wild
    pub fn wild_multiplier(&self, id: SymbolId) -> f64 {
        match self.get(id) {
            Some(symbol) if symbol.is_wild() => symbol.wild_multiplier,
            _ => 1.0,
        }
    }

    /// True if a tile holding `tile` counts as `symbol` in a match
    pub fn matches(&self, tile: SymbolId, symbol: SymbolId) -> bool {
        if tile == EMPTY {
            return false;
        }
        if tile == symbol {
            return true;
        }
        match self.get(tile) {
            Some(s) => s.is_wild() || s.wild_for == Some(symbol),
            None => false,
        }
    }

    /// Best paying non-wild symbol for a run of `count` wilds
    pub fn best_wild(&self, count: u8) -> Option<(SymbolId, f64)> {
        self.best_wild.get(count as usize).copied().flatten()
    }
}
