//! Clearance: winning tiles and exploding bombs

use rf_slot_grid::Shape;

use super::ActionContext;
use crate::cascade;
use crate::events::SpinEvent;
use crate::state::{BOMB_EFFECT, SpinState};

pub(super) fn clear_payouts(state: &mut SpinState, ctx: &mut ActionContext<'_>) -> bool {
    let tiles = cascade::clear_payouts(state);
    if tiles.is_empty() {
        return false;
    }
    ctx.record(SpinEvent::Cleared { tiles });
    true
}

/// Clear the shape around every bomb. Other bombs inside a blast survive
/// unless they are its center; sticky tiles are never cleared.
pub(super) fn exploding_bombs(state: &mut SpinState, ctx: &mut ActionContext<'_>, shape: &Shape) -> bool {
    let grid = state.grid_arc();
    let bombs: Vec<usize> = grid
        .valid_offsets()
        .filter(|&o| state.symbols().is_bomb(state.indexes[o]))
        .collect();
    if bombs.is_empty() {
        return false;
    }

    let mut blasted = vec![false; grid.size()];
    for &bomb in &bombs {
        blasted[bomb] = !state.sticky[bomb];
        for offset in shape.place_clipped(&grid, bomb) {
            if offset == bomb || bombs.contains(&offset) || state.sticky[offset] {
                continue;
            }
            blasted[offset] = true;
        }
    }

    let tiles: Vec<usize> = (0..blasted.len()).filter(|&o| blasted[o]).collect();
    cascade::clear(state, &tiles);
    for &offset in &tiles {
        state.effects[offset] = BOMB_EFFECT;
    }
    log::debug!("{} bomb(s) cleared {} tile(s)", bombs.len(), tiles.len());
    ctx.record(SpinEvent::Cleared { tiles });
    true
}

#[cfg(test)]
mod tests {
    use crate::actions::{Action, ActionContext, ActionKind};
    use crate::events::SpinEvent;
    use crate::fixtures;
    use crate::state::BOMB_EFFECT;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rf_slot_grid::Shape;

    fn fire(action: &Action, state: &mut crate::state::SpinState) -> Vec<SpinEvent> {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events: Vec<SpinEvent> = Vec::new();
        {
            let mut ctx = ActionContext::new(&mut rng, &mut events);
            action.triggered(state, &mut ctx);
        }
        events
    }

    #[test]
    fn test_clear_payout_tiles() {
        let mut state = fixtures::state_5x3();
        state.load(&[1, 2, 3, 1, 5, 6, 1, 2, 3, 4, 5, 6, 4, 2, 3]).unwrap();
        state.payouts[0] = 1;
        state.payouts[3] = 1;
        state.payouts[6] = 1;
        state.sticky[6] = true;

        let events = fire(&Action::new(ActionKind::ClearPayouts), &mut state);
        assert_eq!(events, vec![SpinEvent::Cleared { tiles: vec![0, 3] }]);
        assert_eq!(state.indexes[0], 0);
        assert_eq!(state.indexes[6], 1);

        state.reset_payouts();
        assert!(fire(&Action::new(ActionKind::ClearPayouts), &mut state).is_empty());
    }

    #[test]
    fn test_bombs_spare_other_bombs() {
        let mut state = fixtures::state_5x3();
        // bombs at 4 and 7 (reels 1 and 2, middle row)
        state.load(&[1, 2, 3, 1, 8, 6, 1, 8, 3, 4, 5, 6, 4, 2, 3]).unwrap();
        let action = Action::new(ActionKind::ExplodingBombs {
            shape: Shape::square3x3(),
        });
        let events = fire(&action, &mut state);

        // both 3x3 blasts: reels 0 to 3
        let cleared: Vec<usize> = (0..12).collect();
        assert_eq!(events, vec![SpinEvent::Cleared { tiles: cleared.clone() }]);
        for offset in cleared {
            assert_eq!(state.indexes[offset], 0);
            assert_eq!(state.effects[offset], BOMB_EFFECT);
        }
        assert_eq!(state.indexes[12], 4);
        assert_eq!(state.effects[12], 0);
    }

    #[test]
    fn test_bomb_blast_keeps_sticky() {
        let mut state = fixtures::state_5x3();
        state.load(&[1, 2, 3, 1, 8, 6, 1, 2, 3, 4, 5, 6, 4, 2, 3]).unwrap();
        state.sticky[3] = true;
        let action = Action::new(ActionKind::ExplodingBombs { shape: Shape::cross() });
        let events = fire(&action, &mut state);
        assert_eq!(events, vec![SpinEvent::Cleared { tiles: vec![1, 4, 5, 7] }]);
        assert_eq!(state.indexes[3], 1);
    }
}
