//! Tile and round multipliers

use super::ActionContext;
use crate::events::SpinEvent;
use crate::state::SpinState;
use crate::symbols::SymbolId;

/// Multiply the tile multipliers of sticky `symbol` tiles, capped at `max`,
/// when a non-sticky `trigger` is on the grid.
pub(super) fn grid_multipliers(state: &mut SpinState, symbol: SymbolId, trigger: SymbolId, multiply: u16, max: u16) -> bool {
    let has_multipliers = state.multipliers.as_ref().is_some_and(|m| m.iter().any(|&v| v > 0));
    if !has_multipliers {
        return false;
    }
    let grid = state.grid_arc();
    if !grid
        .valid_offsets()
        .any(|o| state.indexes[o] == trigger && !state.sticky[o])
    {
        return false;
    }

    let targets: Vec<usize> = grid
        .valid_offsets()
        .filter(|&o| state.sticky[o] && state.indexes[o] == symbol)
        .collect();
    let multipliers = state.ensure_multipliers();
    let mut changed = 0;
    for offset in targets {
        let current = multipliers[offset];
        if current == 0 {
            continue;
        }
        multipliers[offset] = (current as u32 * multiply as u32).min(max as u32) as u16;
        changed += 1;
    }

    if changed > 0 {
        log::debug!("Multiplied {} tile multiplier(s) by {}", changed, multiply);
    }
    changed > 0
}

fn apply(state: &mut SpinState, ctx: &mut ActionContext<'_>, level: usize, multiplier: f64, flag: Option<usize>) {
    state.progress_level = level;
    state.multiplier = multiplier;
    ctx.record(SpinEvent::MultiplierChanged { level, multiplier });
    if let Some(flag) = flag {
        state.set_round_flag(flag, level as i32);
        ctx.record(SpinEvent::RoundFlagChanged {
            flag,
            value: level as i32,
        });
    }
}

pub(super) fn first(state: &mut SpinState, ctx: &mut ActionContext<'_>, level: usize, multiplier: f64, flag: Option<usize>) -> bool {
    apply(state, ctx, level, multiplier, flag);
    true
}

/// Advance the progress level by the number of triggers (starting at
/// `first_level`), capped at the end of the list.
pub(super) fn scale(
    state: &mut SpinState,
    ctx: &mut ActionContext<'_>,
    trigger: SymbolId,
    first_level: usize,
    multipliers: &[f64],
    flag: Option<usize>,
) -> bool {
    let count = state.count_symbol(trigger) as usize;
    if count == 0 || multipliers.is_empty() {
        return false;
    }

    let level = if state.progress_level == 0 {
        first_level
    } else {
        state.progress_level + count
    };
    let level = level.clamp(1, multipliers.len());
    apply(state, ctx, level, multipliers[level - 1], flag);
    log::debug!("Progress level {} (x{})", level, state.multiplier);
    true
}

#[cfg(test)]
mod tests {
    use crate::actions::{Action, ActionContext, ActionKind};
    use crate::events::SpinEvent;
    use crate::fixtures;
    use crate::state::SpinState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fire(action: &Action, state: &mut SpinState) -> bool {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut events: Vec<SpinEvent> = Vec::new();
        let mut ctx = ActionContext::new(&mut rng, &mut events);
        action.triggered(state, &mut ctx).is_some()
    }

    #[test]
    fn test_grid_multipliers_capped() {
        let mut state = fixtures::state_5x3();
        state.load(&[9, 1, 2, 3, 9, 4, 1, 5, 6, 3, 2, 4, 3, 4, 10]).unwrap();
        let action = Action::new(ActionKind::GridMultipliers {
            symbol: 9,
            trigger: 10,
            multiply: 2,
            max: 5,
        });
        // no multipliers yet
        assert!(!fire(&action, &mut state));

        state.sticky[0] = true;
        state.sticky[4] = true;
        state.ensure_multipliers()[0] = 2;
        state.ensure_multipliers()[4] = 3;
        assert!(fire(&action, &mut state));
        assert_eq!(state.tile_multiplier(0), 4.0);
        assert_eq!(state.tile_multiplier(4), 5.0);

        // a sticky trigger does not count
        state.sticky[14] = true;
        assert!(!fire(&action, &mut state));
    }

    #[test]
    fn test_first_multiplier_sets_flag() {
        let mut state = fixtures::state_5x3();
        let action = Action::new(ActionKind::FirstMultiplier {
            level: 2,
            multiplier: 3.0,
            flag: Some(1),
        });
        assert!(fire(&action, &mut state));
        assert_eq!(state.progress_level, 2);
        assert_eq!(state.multiplier, 3.0);
        assert_eq!(state.round_flag(1), 2);
    }

    #[test]
    fn test_multiplier_scale_progression() {
        let mut state = fixtures::state_5x3();
        let action = Action::new(ActionKind::MultiplierScale {
            trigger: 10,
            first_level: 1,
            multipliers: vec![1.0, 2.0, 3.0, 5.0, 10.0],
            flag: None,
        });

        state.load(&[1, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6, 1, 2, 3]).unwrap();
        assert!(!fire(&action, &mut state));

        state.load(&[10, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6, 1, 2, 3]).unwrap();
        assert!(fire(&action, &mut state));
        assert_eq!((state.progress_level, state.multiplier), (1, 1.0));

        state.load(&[10, 2, 3, 4, 10, 6, 1, 2, 3, 4, 5, 6, 1, 2, 3]).unwrap();
        assert!(fire(&action, &mut state));
        assert_eq!((state.progress_level, state.multiplier), (3, 3.0));

        state.load(&[10, 2, 3, 10, 10, 6, 1, 2, 10, 4, 5, 6, 1, 2, 3]).unwrap();
        assert!(fire(&action, &mut state));
        assert_eq!((state.progress_level, state.multiplier), (5, 10.0));
    }
}
