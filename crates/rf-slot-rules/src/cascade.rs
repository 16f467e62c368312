//! Cascade engine: clear, drop and refill
//!
//! ## Architecture
//!
//! ```text
//! clear / clear_payouts   tiles → 0 (nothing shifts)
//!         │
//!         v
//! drop_floating           per reel, bottom-up: nearest non-sticky symbol
//!         │               above an empty tile falls into it
//!         v
//! refill                  remaining empty tiles drawn from the spinner
//! ```

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::spinner::Spinner;
use crate::state::SpinState;
use crate::symbols::EMPTY;

/// One symbol falling from `from` to `to` within a reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeMove {
    pub from: usize,
    pub to: usize,
}

/// Empty the given tiles; returns how many held a symbol
pub fn clear(state: &mut SpinState, offsets: &[usize]) -> usize {
    let mut cleared = 0;
    for &offset in offsets {
        if !state.grid().is_valid_offset(offset) || state.indexes[offset] == EMPTY {
            continue;
        }
        state.indexes[offset] = EMPTY;
        if let Some(multipliers) = state.multipliers.as_mut() {
            multipliers[offset] = 0;
        }
        cleared += 1;
    }
    cleared
}

/// Empty every non-sticky tile that takes part in a payout
pub fn clear_payouts(state: &mut SpinState) -> Vec<usize> {
    let offsets: Vec<usize> = (0..state.indexes.len())
        .filter(|&offset| state.payouts[offset] > 0 && !state.sticky[offset])
        .collect();
    clear(state, &offsets);
    offsets
}

/// Drop floating symbols down to the lowest empty tiles of their reel.
///
/// Sticky tiles stay put; symbols above them fall past. Tile multipliers
/// travel with their symbol. The moves are returned in execution order.
pub fn drop_floating(state: &mut SpinState) -> Vec<CascadeMove> {
    let mut moves = Vec::new();

    for reel in 0..state.grid().reels() {
        let range = state.grid().reel_offsets(reel);
        let start = range.start;
        let mut upper = range.end;

        for bottom in range.rev() {
            if state.indexes[bottom] != EMPTY {
                continue;
            }
            upper = upper.min(bottom);

            let Some(from) = (start..upper)
                .rev()
                .find(|&o| state.indexes[o] != EMPTY && !state.sticky[o])
            else {
                break;
            };

            state.indexes[bottom] = state.indexes[from];
            state.indexes[from] = EMPTY;
            if let Some(multipliers) = state.multipliers.as_mut() {
                multipliers[bottom] = multipliers[from];
                multipliers[from] = 0;
            }
            moves.push(CascadeMove { from, to: bottom });
            upper = from;
        }
    }

    if !moves.is_empty() {
        log::debug!("Cascade: {} symbols dropped", moves.len());
    }
    moves
}

/// Start a refill spin: fill every empty valid tile from the spinner and
/// recount the specials. Pre-existing symbols are untouched.
pub fn refill(state: &mut SpinState, spinner: &dyn Spinner, rng: &mut dyn RngCore) -> Vec<usize> {
    state.begin_spin();
    let filled = state.fill_empty(spinner, rng);
    state.count_specials();
    log::trace!("Refill {} filled {} tile(s)", state.spin_seq, filled.len());
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_clear_and_drop() {
        let mut state = fixtures::state_5x3();
        state.load(&[1, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6, 1, 2, 3]).unwrap();

        assert_eq!(clear(&mut state, &[2, 4, 4, 7]), 3);
        assert_eq!(state.indexes, vec![1, 2, 0, 4, 0, 6, 1, 0, 3, 4, 5, 6, 1, 2, 3]);

        let moves = drop_floating(&mut state);
        assert_eq!(
            moves,
            vec![
                CascadeMove { from: 1, to: 2 },
                CascadeMove { from: 0, to: 1 },
                CascadeMove { from: 3, to: 4 },
                CascadeMove { from: 6, to: 7 },
            ]
        );
        assert_eq!(state.indexes, vec![0, 1, 2, 0, 4, 6, 0, 1, 3, 4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_sticky_tiles_do_not_fall() {
        let mut state = fixtures::state_5x3();
        state.load(&[1, 2, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]).unwrap();
        state.sticky[1] = true;
        state.ensure_multipliers()[0] = 5;

        let moves = drop_floating(&mut state);
        assert_eq!(moves, vec![CascadeMove { from: 0, to: 2 }]);
        assert_eq!(&state.indexes[0..3], &[0, 2, 1]);
        assert_eq!(state.tile_multiplier(2), 5.0);
        assert_eq!(state.tile_multiplier(0), 1.0);
    }

    #[test]
    fn test_clear_payouts_spares_sticky() {
        let mut state = fixtures::state_5x3();
        state.load(&[1; 15]).unwrap();
        state.payouts[0] = 1;
        state.payouts[3] = 2;
        state.sticky[3] = true;
        assert_eq!(clear_payouts(&mut state), vec![0]);
        assert_eq!(state.indexes[0], 0);
        assert_eq!(state.indexes[3], 1);
    }

    #[test]
    fn test_refill_only_empty_tiles() {
        let mut state = fixtures::state_hex();
        let mut grid = vec![0u8; 24];
        for offset in state.grid().valid_offsets() {
            grid[offset] = 1;
        }
        grid[9] = 0;
        grid[13] = 0;
        state.load(&grid).unwrap();

        let spinner = fixtures::constant_spinner(5);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let filled = refill(&mut state, &spinner, &mut rng);
        assert_eq!(filled, vec![9, 13]);
        assert_eq!(state.indexes[9], 5);
        // masked-out tiles stay empty
        assert_eq!(state.indexes[2], 0);
        assert_eq!(state.count_symbol(1), 16);
    }

    fn sorted(mut v: Vec<u8>) -> Vec<u8> {
        v.sort_unstable();
        v
    }

    proptest! {
        #[test]
        fn drop_conserves_symbols_per_reel(
            tiles in proptest::collection::vec(0u8..4, 15),
            sticky in proptest::collection::vec(any::<bool>(), 15),
        ) {
            let mut state = fixtures::state_5x3();
            state.load(&tiles).unwrap();
            for offset in 0..15 {
                state.sticky[offset] = sticky[offset] && tiles[offset] != 0;
            }

            let before: Vec<Vec<u8>> = (0..5)
                .map(|reel| sorted(state.indexes[reel * 3..reel * 3 + 3].iter().copied().filter(|&s| s != 0).collect()))
                .collect();
            drop_floating(&mut state);

            for reel in 0..5 {
                let column = &state.indexes[reel * 3..reel * 3 + 3];
                let after = sorted(column.iter().copied().filter(|&s| s != 0).collect());
                prop_assert_eq!(&before[reel], &after);

                // no movable symbol floats above an empty tile
                for row in 0..3 {
                    if column[row] == 0 {
                        for above in 0..row {
                            prop_assert!(column[above] == 0 || state.sticky[reel * 3 + above]);
                        }
                    }
                }
            }
        }
    }
}
