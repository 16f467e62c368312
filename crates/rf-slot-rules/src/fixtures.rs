//! Shared test builders

use std::sync::Arc;

use rf_slot_grid::GridTopology;

use crate::spinner::WeightedSpinner;
use crate::state::SpinState;
use crate::symbols::{Symbol, SymbolId, SymbolKind, SymbolSet};
use crate::weighting::Weighting;

/// Symbols 1-6 regular, 7 hero, 8 bomb, 9 wild, 10 scatter, 12 wild ×2
pub(crate) fn symbols() -> Arc<SymbolSet> {
    let set = SymbolSet::new(vec![
        Symbol::standard(1, "HP1", &[0.0, 0.0, 5.0, 10.0, 50.0]),
        Symbol::standard(2, "HP2", &[0.0, 0.0, 4.0, 8.0, 40.0]),
        Symbol::standard(3, "HP3", &[0.0, 0.0, 3.0, 6.0, 30.0]),
        Symbol::standard(4, "LP1", &[0.0, 0.0, 2.0, 4.0, 20.0]),
        Symbol::standard(5, "LP2", &[0.0, 0.0, 1.0, 2.0, 10.0]),
        Symbol::standard(6, "LP3", &[0.0, 0.0, 1.0, 2.0, 10.0]),
        Symbol::new(7, "HERO", SymbolKind::Hero).with_pays(&[0.0, 0.0, 2.0, 5.0, 25.0]),
        Symbol::new(8, "BOMB", SymbolKind::Bomb),
        Symbol::wild(9, "WILD").with_pays(&[0.0, 0.0, 10.0, 50.0, 100.0]),
        Symbol::scatter(10, "SCATTER", &[0.0, 0.0, 2.0, 10.0, 50.0]),
        Symbol::wild(12, "WILDx2").with_multiplier(2.0),
    ])
    .unwrap();
    Arc::new(set)
}

pub(crate) fn grid_5x3() -> Arc<GridTopology> {
    Arc::new(GridTopology::new(5, 3).unwrap())
}

/// 6 reels, mask 2-3-4-4-3-2
pub(crate) fn grid_hex() -> Arc<GridTopology> {
    Arc::new(GridTopology::with_mask(6, 4, &[2, 3, 4, 4, 3, 2]).unwrap())
}

pub(crate) fn state_5x3() -> SpinState {
    SpinState::new(grid_5x3(), symbols())
}

pub(crate) fn state_hex() -> SpinState {
    SpinState::new(grid_hex(), symbols())
}

/// Spinner that always lands `symbol`
pub(crate) fn constant_spinner(symbol: SymbolId) -> WeightedSpinner {
    let weighting = Weighting::new(&[(symbol as u16, 1)]).unwrap();
    WeightedSpinner::uniform_reels(weighting, 6).unwrap()
}

/// Route `log` output through the test harness; safe to call repeatedly
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
