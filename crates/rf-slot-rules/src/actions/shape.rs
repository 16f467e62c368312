//! Super shapes and shape refills
//!
//! A super shape is a template fully covered by one symbol that occurs
//! nowhere else on the grid. Once found, the template becomes sticky, the
//! rest of the grid is cleared, and every refill that lands the same symbol
//! again makes those new tiles sticky too until no new one appears.

use rf_slot_grid::Shape;

use super::{ActionContext, sticky_tiles};
use crate::events::SpinEvent;
use crate::state::SpinState;
use crate::symbols::{EMPTY, SymbolId};

pub(super) fn super_shape(state: &mut SpinState, ctx: &mut ActionContext<'_>, shape: &Shape, centers: &[usize]) -> bool {
    let grid = state.grid_arc();

    if let Some(symbol) = state.super_symbol {
        let fresh: Vec<usize> = grid
            .valid_offsets()
            .filter(|&o| state.indexes[o] == symbol && !state.sticky[o])
            .collect();
        if fresh.is_empty() {
            return false;
        }
        for &offset in &fresh {
            state.sticky[offset] = true;
        }
        state.clear_non_sticky();
        log::debug!("Super symbol {}: {} new tile(s)", symbol, fresh.len());
        ctx.record(SpinEvent::StickyChanged {
            tiles: sticky_tiles(state),
        });
        return true;
    }

    state.reset_sticky();
    for &center in centers {
        let Some(tiles) = shape.place(&grid, center) else {
            continue;
        };
        let symbol = state.indexes[tiles[0]];
        if symbol == EMPTY || tiles.iter().any(|&o| state.indexes[o] != symbol) {
            continue;
        }
        if state.count_symbol(symbol) as usize != tiles.len() {
            continue;
        }

        state.super_symbol = Some(symbol);
        for &offset in &tiles {
            state.sticky[offset] = true;
            state.super_shape[offset] = true;
        }
        state.clear_non_sticky();
        log::debug!("Super shape of symbol {} around tile {}", symbol, center);
        ctx.record(SpinEvent::StickyChanged { tiles: tiles.to_vec() });
        return true;
    }
    false
}

/// Make the first template fully covered by `symbol` sticky and clear the rest
pub(super) fn shape_refill(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    symbol: SymbolId,
    shape: &Shape,
    centers: &[usize],
) -> bool {
    let grid = state.grid_arc();
    state.reset_sticky();

    for &center in centers {
        let Some(tiles) = shape.place(&grid, center) else {
            continue;
        };
        if !tiles.iter().all(|&o| state.indexes[o] == symbol) {
            continue;
        }

        for &offset in &tiles {
            state.sticky[offset] = true;
        }
        state.clear_non_sticky();
        log::debug!("Shape of symbol {} around tile {} held for refill", symbol, center);
        ctx.record(SpinEvent::StickyChanged { tiles: tiles.to_vec() });
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::actions::{Action, ActionContext, ActionKind, ActionResult};
    use crate::events::SpinEvent;
    use crate::fixtures;
    use crate::state::SpinState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rf_slot_grid::Shape;

    fn fire(action: &Action, state: &mut SpinState) -> Option<Vec<SpinEvent>> {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut events: Vec<SpinEvent> = Vec::new();
        let hit = {
            let mut ctx = ActionContext::new(&mut rng, &mut events);
            action.triggered(state, &mut ctx).is_some()
        };
        hit.then_some(events)
    }

    fn sticky(state: &SpinState) -> Vec<usize> {
        (0..state.sticky.len()).filter(|&o| state.sticky[o]).collect()
    }

    #[test]
    fn test_shape_refill_on_hex_grid() {
        let mut state = fixtures::state_hex();
        let mut grid = vec![0u8; 24];
        let mut filler = [1u8, 2, 3, 4, 5].into_iter().cycle();
        for offset in state.grid().valid_offsets() {
            grid[offset] = filler.next().unwrap_or(1);
        }
        for offset in [4, 5, 6, 8, 10, 12, 13, 14] {
            grid[offset] = 6;
        }
        state.load(&grid).unwrap();

        let action = Action::new(ActionKind::ShapeRefill {
            symbol: 6,
            shape: Shape::ring3x3(),
            centers: vec![9],
        });
        assert_eq!(action.result(), ActionResult::Refill);

        let events = fire(&action, &mut state).unwrap();
        assert_eq!(sticky(&state), vec![4, 5, 6, 8, 10, 12, 13, 14]);
        // everything else is cleared for the refill
        assert_eq!(state.indexes[9], 0);
        assert_eq!(state.indexes[0], 0);
        assert_eq!(state.count_symbol(6), 8);
        assert!(matches!(&events[..], [SpinEvent::StickyChanged { tiles }] if tiles.len() == 8));
    }

    #[test]
    fn test_shape_refill_needs_full_template() {
        let mut state = fixtures::state_hex();
        let mut grid = vec![0u8; 24];
        for offset in state.grid().valid_offsets() {
            grid[offset] = 1;
        }
        for offset in [4, 5, 6, 8, 10, 12, 13] {
            grid[offset] = 6;
        }
        state.load(&grid).unwrap();

        let action = Action::new(ActionKind::ShapeRefill {
            symbol: 6,
            shape: Shape::ring3x3(),
            centers: vec![9],
        });
        assert!(fire(&action, &mut state).is_none());
        assert!(!state.has_sticky());
    }

    #[test]
    fn test_super_shape_detect_and_grow() {
        let mut state = fixtures::state_5x3();
        state
            .load(&[5, 5, 5, 5, 5, 5, 5, 5, 5, 1, 2, 3, 4, 1, 2])
            .unwrap();
        let action = Action::new(ActionKind::SuperShape {
            shape: Shape::square3x3(),
            centers: vec![4, 7, 10],
        });
        assert_eq!(action.result(), ActionResult::SuperRefill);

        assert!(fire(&action, &mut state).is_some());
        assert_eq!(state.super_symbol, Some(5));
        assert_eq!(sticky(&state), (0..9).collect::<Vec<_>>());
        assert!(state.super_shape[4]);
        assert_eq!(&state.indexes[9..], &[0; 6]);

        // a refill lands two more fives
        state.indexes[9..].copy_from_slice(&[5, 1, 2, 3, 5, 4]);
        assert!(fire(&action, &mut state).is_some());
        assert!(state.sticky[9] && state.sticky[13]);
        assert!(!state.super_shape[9]);
        assert_eq!(state.indexes[10], 0);

        // nothing new: the chain ends
        state.indexes[10] = 1;
        state.indexes[11] = 2;
        state.indexes[12] = 3;
        state.indexes[14] = 4;
        assert!(fire(&action, &mut state).is_none());
    }

    #[test]
    fn test_super_shape_symbol_must_be_unique() {
        let mut state = fixtures::state_5x3();
        state
            .load(&[5, 5, 5, 5, 5, 5, 5, 5, 5, 1, 2, 5, 4, 1, 2])
            .unwrap();
        let action = Action::new(ActionKind::SuperShape {
            shape: Shape::square3x3(),
            centers: vec![4],
        });
        assert!(fire(&action, &mut state).is_none());
        assert_eq!(state.super_symbol, None);
    }
}
