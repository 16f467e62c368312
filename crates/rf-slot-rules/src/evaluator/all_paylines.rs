//! All-paylines ("ways") matching
//!
//! Every path that picks one row per reel, starting at reel 0, is a line.
//! A path is extended reel by reel while the next tile matches; each maximal
//! path pays once.

use smallvec::SmallVec;

use super::{combined_multiplier, mark_tiles};
use crate::payout::{Payout, PayoutKind};
use crate::state::SpinState;
use crate::symbols::SymbolId;

/// Evaluate all row paths. With `highest` set, a leading run of two or more
/// wilds pays as the best wild symbol when that beats the natural match.
pub fn evaluate(state: &mut SpinState, highest: bool) -> Vec<Payout> {
    let reels = state.grid().reels();
    let payouts = {
        let mut walker = Walker {
            state: &*state,
            highest,
            rows: SmallVec::from_elem(0, reels),
            found: Vec::new(),
        };
        walker.start();
        walker.found
    };

    for payout in &payouts {
        mark_tiles(state, &payout.tiles);
    }
    payouts
}

struct Walker<'a> {
    state: &'a SpinState,
    highest: bool,
    rows: SmallVec<[u8; 12]>,
    found: Vec<Payout>,
}

impl Walker<'_> {
    fn start(&mut self) {
        let grid = self.state.grid();
        let symbols = self.state.symbols();
        for offset in grid.reel_offsets(0) {
            let id = self.state.indexes[offset];
            let Some(symbol) = symbols.get(id) else {
                continue;
            };
            self.rows[0] = offset as u8;
            self.walk(id, 1, symbol.is_wild() as usize);
        }
    }

    fn walk(&mut self, symbol: SymbolId, reel: usize, wilds: usize) -> usize {
        let state = self.state;
        let grid = state.grid();
        let symbols = state.symbols();
        if reel == grid.reels() {
            return self.settle(symbol, reel, wilds);
        }
        let Some(current) = symbols.get(symbol) else {
            return 0;
        };

        let mut found = 0;
        let range = grid.reel_offsets(reel);
        let first = range.start;
        for offset in range {
            let next = state.indexes[offset];
            let Some(next_symbol) = symbols.get(next) else {
                continue;
            };
            let wilds = wilds + next_symbol.is_wild() as usize;
            let row = (offset - first) as u8;

            if current.is_wild() || current.wild_for == Some(next) {
                // a wild (or split symbol) takes the identity of what follows
                self.rows[reel] = row;
                found += self.walk(next, reel + 1, wilds);
            } else if next_symbol.is_wild() || next == symbol || next_symbol.wild_for == Some(symbol) {
                self.rows[reel] = row;
                found += self.walk(symbol, reel + 1, wilds);
            }
        }

        if found == 0 {
            self.settle(symbol, reel, wilds)
        } else {
            found
        }
    }

    fn settle(&mut self, symbol: SymbolId, count: usize, wilds: usize) -> usize {
        let state = self.state;
        let grid = state.grid();
        let symbols = state.symbols();

        let tiles: SmallVec<[usize; 12]> = self.rows[..count]
            .iter()
            .enumerate()
            .map(|(reel, &row)| grid.offset(reel, row as usize))
            .collect();
        let leading = tiles
            .iter()
            .take_while(|&&o| symbols.is_wild(state.indexes[o]))
            .count();

        let best_wild = if self.highest && wilds > 0 && leading >= 2 {
            symbols.best_wild(leading as u8)
        } else {
            None
        };
        let wild_pay = best_wild.map_or(0.0, |(_, pay)| pay);
        let pay = symbols.get(symbol).map_or(0.0, |s| s.payout(count as u8));

        let (symbol, pay, tiles) = if pay > 0.0 && pay >= wild_pay {
            (symbol, pay, &tiles[..])
        } else if let Some((best, pay)) = best_wild {
            (best, pay, &tiles[..leading])
        } else {
            return 0;
        };

        self.found.push(
            Payout::new(
                PayoutKind::AllPaylines,
                symbol,
                tiles.len() as u8,
                pay,
                combined_multiplier(state, tiles),
            )
            .with_payline(0, &self.rows[..tiles.len()])
            .with_tiles(tiles.to_vec()),
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_each_path_pays_once() {
        let mut state = fixtures::state_5x3();
        state.load(&[1, 1, 2, 3, 4, 1, 1, 5, 6, 2, 3, 4, 5, 6, 2]).unwrap();

        let payouts = evaluate(&mut state, false);
        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts[0].tiles, vec![0, 5, 6]);
        assert_eq!(payouts[0].pay_rows.as_slice(), &[0, 2, 0]);
        assert_eq!(payouts[1].tiles, vec![1, 5, 6]);
        assert_eq!(payouts[1].pay_rows.as_slice(), &[1, 2, 0]);
        for p in &payouts {
            assert_eq!((p.symbol, p.count), (1, 3));
            assert_eq!(p.kind, PayoutKind::AllPaylines);
            assert_relative_eq!(p.factor, 5.0);
        }
        // shared tiles are marked by both paths
        assert_eq!(state.payouts[5], 2);
        assert_eq!(state.payouts[2], 0);
    }

    #[test]
    fn test_wild_takes_next_identity() {
        let mut state = fixtures::state_5x3();
        state.load(&[9, 2, 3, 1, 2, 4, 1, 5, 6, 3, 4, 5, 6, 6, 6]).unwrap();

        let payouts = evaluate(&mut state, false);
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].symbol, 1);
        assert_eq!(payouts[0].count, 3);
        assert_eq!(payouts[0].tiles, vec![0, 3, 6]);
    }

    #[test]
    fn test_highest_wild_run() {
        let grid = std::sync::Arc::new(rf_slot_grid::GridTopology::new(5, 1).unwrap());
        let mut state = SpinState::new(grid, fixtures::symbols());
        state.load(&[9, 9, 9, 5, 4]).unwrap();

        let plain = evaluate(&mut state, false);
        assert_eq!(plain.len(), 1);
        assert_eq!((plain[0].symbol, plain[0].count), (5, 4));
        assert_relative_eq!(plain[0].factor, 2.0);

        // three wilds as the best symbol (1) pay 5
        let highest = evaluate(&mut state, true);
        assert_eq!(highest.len(), 1);
        assert_eq!((highest[0].symbol, highest[0].count), (1, 3));
        assert_eq!(highest[0].tiles, vec![0, 1, 2]);
        assert_relative_eq!(highest[0].factor, 5.0);
    }
}
