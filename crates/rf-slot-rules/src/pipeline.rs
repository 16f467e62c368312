//! Stage-ordered action pipeline
//!
//! ## Architecture
//!
//! ```text
//! ReviseGrid → TestGrid → ExpandBefore → RegularPayouts → TestClearance
//!                                                              │
//!                          empty tiles: drop (cascading) + refill request
//!                                                              │
//! ExpandAfter → TestStickiness → Injection ──(triggered)──> re-evaluate
//!                                                           regular payouts
//!      → ExtraPayouts → AwardBonuses → PreBonus (only with a pending
//!                                               free spin or refill)
//! ```
//!
//! Actions keep their configuration order within a stage. Every triggered
//! action is reported as [`SpinEvent::ActionTriggered`] after the events it
//! produced itself.

use std::sync::Arc;

use rand::RngCore;
use rf_slot_grid::GridTopology;
use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionContext, ActionResult, Stage};
use crate::cascade::{self, CascadeMove};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::events::{EventSink, SpinEvent};
use crate::payout::{Payout, total_payout};
use crate::state::{SpinKind, SpinState};
use crate::symbols::{EMPTY, SymbolId, SymbolSet};

/// Result of running the pipeline over one grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// What produced the evaluated grid
    pub kind: SpinKind,
    /// Regular payouts first, then every other payout in stage order
    pub payouts: Vec<Payout>,
    pub events: Vec<SpinEvent>,
    /// Free spins awarded by this spin
    pub free_spins: u32,
    /// Refill requested for the next spin
    pub refill: Option<SpinKind>,
    pub moves: Vec<CascadeMove>,
    /// Grid after all stages
    pub grid: Vec<SymbolId>,
}

impl SpinOutcome {
    pub fn total(&self) -> f64 {
        total_payout(&self.payouts)
    }

    pub fn is_win(&self) -> bool {
        self.total() > 0.0
    }
}

/// Output gathered while the stages run
#[derive(Default)]
struct StageRun {
    regular: Vec<Payout>,
    other: Vec<Payout>,
    free_spins: u32,
    refill: Option<SpinKind>,
    moves: Vec<CascadeMove>,
}

impl StageRun {
    fn request(&mut self, kind: SpinKind) {
        if self.refill != Some(SpinKind::Super) {
            self.refill = Some(kind);
        }
    }
}

/// Validated, stage-bucketed list of actions
#[derive(Debug, Clone)]
pub struct ActionPipeline {
    config: EngineConfig,
    grid: Arc<GridTopology>,
    symbols: Arc<SymbolSet>,
    stages: Vec<Vec<Action>>,
}

impl ActionPipeline {
    /// Validate the engine config and every action, then bucket the actions
    /// by stage. Symbols the set does not know are logged, not rejected.
    pub fn new(actions: Vec<Action>, config: EngineConfig, symbols: Arc<SymbolSet>) -> Result<Self> {
        config.validate()?;
        let grid = Arc::new(config.grid.build()?);

        let mut stages: Vec<Vec<Action>> = Stage::ALL.iter().map(|_| Vec::new()).collect();
        for action in actions {
            action.validate(&grid)?;
            for symbol in action.symbols() {
                if !symbols.contains(symbol) {
                    log::warn!("Action '{}' references unknown symbol {}", action.name(), symbol);
                }
            }
            stages[action.stage().index()].push(action);
        }

        log::debug!(
            "Pipeline: {} action(s) on a {}x{} grid",
            stages.iter().map(Vec::len).sum::<usize>(),
            grid.reels(),
            grid.rows()
        );
        Ok(Self {
            config,
            grid,
            symbols,
            stages,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridTopology {
        &self.grid
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Actions of one stage in configuration order
    pub fn stage(&self, stage: Stage) -> &[Action] {
        &self.stages[stage.index()]
    }

    /// Fresh round state sharing this pipeline's grid and symbols
    pub fn new_state(&self) -> SpinState {
        SpinState::new(Arc::clone(&self.grid), Arc::clone(&self.symbols))
            .with_multiplier_needs_wild(self.config.multiplier_needs_wild)
    }

    /// Run every stage over the current grid, collecting events in the outcome
    pub fn run(&self, state: &mut SpinState, rng: &mut dyn RngCore) -> SpinOutcome {
        let mut events: Vec<SpinEvent> = Vec::new();
        let mut outcome = self.run_with(state, rng, &mut events);
        outcome.events = events;
        outcome
    }

    /// Run every stage, streaming events to `sink`. The outcome's event list
    /// stays empty.
    pub fn run_with(&self, state: &mut SpinState, rng: &mut dyn RngCore, sink: &mut dyn EventSink) -> SpinOutcome {
        let mut run = StageRun::default();

        for stage in Stage::ALL {
            if stage == Stage::PreBonus && state.free_spins == 0 && run.refill.is_none() {
                continue;
            }
            let triggered = self.run_stage(stage, state, rng, sink, &mut run);

            match stage {
                Stage::TestClearance => self.settle(state, sink, &mut run),
                Stage::Injection if triggered => self.reevaluate(state, sink, &mut run),
                _ => {}
            }
        }

        let mut payouts = run.regular;
        payouts.append(&mut run.other);
        let outcome = SpinOutcome {
            kind: state.kind,
            payouts,
            events: Vec::new(),
            free_spins: run.free_spins,
            refill: run.refill,
            moves: run.moves,
            grid: state.indexes.clone(),
        };
        log::debug!(
            "Spin {} ({:?}): {} payout(s), total {:.2}, refill {:?}",
            state.spin_seq,
            outcome.kind,
            outcome.payouts.len(),
            outcome.total(),
            outcome.refill
        );
        outcome
    }

    /// Trigger each action of a stage; true if any did
    fn run_stage(
        &self,
        stage: Stage,
        state: &mut SpinState,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
        run: &mut StageRun,
    ) -> bool {
        let mut any = false;
        for action in self.stage(stage) {
            let mut ctx = ActionContext::new(&mut *rng, &mut *sink);
            let Some(hit) = action.triggered(state, &mut ctx) else {
                continue;
            };
            any = true;

            let payouts = ctx.take_payouts();
            if stage == Stage::RegularPayouts {
                run.regular.extend(payouts);
            } else {
                run.other.extend(payouts);
            }

            match hit.result() {
                ActionResult::Refill => run.request(SpinKind::Refill),
                ActionResult::SuperRefill => run.request(SpinKind::Super),
                _ if ctx.refill_requested() => run.request(SpinKind::Refill),
                _ => {}
            }

            ctx.record(SpinEvent::ActionTriggered {
                name: hit.name().to_string(),
                stage,
                result: hit.result(),
            });

            if hit.free_spins() > 0 {
                state.free_spins += hit.free_spins();
                run.free_spins += hit.free_spins();
                log::debug!("'{}' awarded {} free spin(s)", hit.name(), hit.free_spins());
                ctx.record(SpinEvent::FreeSpinsAwarded {
                    count: hit.free_spins(),
                    remaining: state.free_spins,
                });
            }
        }
        any
    }

    /// Empty tiles after clearance: cascade them down and ask for a refill
    fn settle(&self, state: &mut SpinState, sink: &mut dyn EventSink, run: &mut StageRun) {
        if !self.grid.valid_offsets().any(|o| state.indexes[o] == EMPTY) {
            return;
        }
        if self.config.cascading {
            let moves = cascade::drop_floating(state);
            if !moves.is_empty() {
                sink.record(SpinEvent::CascadeMoves { moves: moves.clone() });
                run.moves.extend(moves);
            }
        }
        if run.refill.is_none() {
            run.refill = Some(SpinKind::Refill);
        }
    }

    /// Injected symbols can complete new wins: drop the regular payouts and
    /// evaluate them again
    fn reevaluate(&self, state: &mut SpinState, sink: &mut dyn EventSink, run: &mut StageRun) {
        state.reset_payouts();
        run.regular.clear();
        for action in self.stage(Stage::RegularPayouts) {
            if let Some((hit, payouts)) = action.payout(state) {
                run.regular.extend(payouts);
                sink.record(SpinEvent::ActionTriggered {
                    name: hit.name().to_string(),
                    stage: Stage::RegularPayouts,
                    result: hit.result(),
                });
            }
        }
        log::trace!("Re-evaluated {} regular payout(s) after injection", run.regular.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use crate::config::GridSpec;
    use crate::fixtures;
    use crate::paylines::{PayDirection, Payline, PaylineSet};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rf_slot_grid::Shape;

    fn lines_5x3() -> PaylineSet {
        let grid = fixtures::grid_5x3();
        PaylineSet::new(
            &grid,
            PayDirection::LeftToRight,
            false,
            vec![
                Payline::new(1, &[1, 1, 1, 1, 1]),
                Payline::new(2, &[0, 0, 0, 0, 0]),
                Payline::new(3, &[2, 2, 2, 2, 2]),
            ],
        )
        .unwrap()
    }

    fn pipeline(actions: Vec<Action>, config: EngineConfig) -> ActionPipeline {
        ActionPipeline::new(actions, config, fixtures::symbols()).unwrap()
    }

    fn triggered(outcome: &SpinOutcome) -> Vec<&str> {
        outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SpinEvent::ActionTriggered { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_buckets_keep_order() {
        let p = pipeline(
            vec![
                Action::new(ActionKind::ClearPayouts).with_name("b"),
                Action::new(ActionKind::Paylines(lines_5x3())),
                Action::new(ActionKind::ResetSticky).with_stage(Stage::TestClearance).with_name("c"),
            ],
            EngineConfig::default(),
        );
        let names: Vec<&str> = p.stage(Stage::TestClearance).iter().map(Action::name).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(p.stage(Stage::RegularPayouts).len(), 1);
        assert!(p.stage(Stage::PreBonus).is_empty());
    }

    #[test]
    fn test_rejects_invalid_action() {
        let bad = Action::new(ActionKind::ClearPayouts).with_result(ActionResult::FreeSpins);
        assert!(ActionPipeline::new(vec![bad], EngineConfig::default(), fixtures::symbols()).is_err());

        let config = EngineConfig::default().with_max_round_spins(0);
        assert!(ActionPipeline::new(Vec::new(), config, fixtures::symbols()).is_err());
    }

    #[test]
    fn test_payline_win_and_clearance_refill() {
        fixtures::init_logging();
        let p = pipeline(
            vec![
                Action::new(ActionKind::Paylines(lines_5x3())),
                Action::new(ActionKind::ClearPayouts),
            ],
            EngineConfig::default(),
        );
        let mut state = p.new_state();
        state.load(&[1, 2, 3, 1, 5, 6, 1, 2, 3, 1, 5, 6, 1, 2, 3]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = p.run(&mut state, &mut rng);
        assert_eq!(outcome.payouts.len(), 1);
        assert_relative_eq!(outcome.total(), 50.0);
        assert_eq!(outcome.refill, Some(SpinKind::Refill));
        assert!(outcome.moves.is_empty());
        assert_eq!(triggered(&outcome), vec!["paylines", "clear-payouts"]);
        assert_eq!(&outcome.grid[..3], &[0, 2, 3]);
        assert!(outcome.events.contains(&SpinEvent::Cleared {
            tiles: vec![0, 3, 6, 9, 12]
        }));
    }

    #[test]
    fn test_no_win_no_refill() {
        let p = pipeline(
            vec![
                Action::new(ActionKind::Paylines(lines_5x3())),
                Action::new(ActionKind::ClearPayouts),
            ],
            EngineConfig::default(),
        );
        let mut state = p.new_state();
        state.load(&[1, 2, 3, 4, 5, 6, 2, 3, 4, 5, 6, 1, 3, 4, 5]).unwrap();
        let outcome = p.run(&mut state, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(!outcome.is_win());
        assert_eq!(outcome.refill, None);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_cascading_drops_symbols() {
        let p = pipeline(
            vec![
                Action::new(ActionKind::Paylines(lines_5x3())),
                Action::new(ActionKind::ClearPayouts),
            ],
            EngineConfig::default().with_cascading(true),
        );
        let mut state = p.new_state();
        // bottom row of fives wins
        state.load(&[1, 2, 5, 3, 4, 5, 6, 1, 5, 2, 3, 5, 4, 6, 5]).unwrap();
        let outcome = p.run(&mut state, &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(outcome.refill, Some(SpinKind::Refill));
        assert_eq!(outcome.moves.len(), 10);
        assert_eq!(&outcome.grid[..3], &[0, 1, 2]);
        assert!(
            outcome
                .events
                .iter()
                .any(|e| matches!(e, SpinEvent::CascadeMoves { moves } if moves.len() == 10))
        );
    }

    #[test]
    fn test_shape_refill_on_hex_grid() {
        let config = EngineConfig::new(GridSpec::hexagonal_6x4());
        let p = pipeline(
            vec![Action::new(ActionKind::ShapeRefill {
                symbol: 6,
                shape: Shape::ring3x3(),
                centers: vec![9],
            })],
            config,
        );
        let mut state = p.new_state();
        let mut grid = vec![0u8; 24];
        for offset in state.grid().valid_offsets() {
            grid[offset] = 1 + (offset % 5) as u8;
        }
        for offset in [4, 5, 6, 8, 10, 12, 13, 14] {
            grid[offset] = 6;
        }
        state.load(&grid).unwrap();

        let outcome = p.run(&mut state, &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(outcome.refill, Some(SpinKind::Refill));
        assert_eq!(triggered(&outcome), vec!["shape-refill"]);
        assert_eq!(state.sticky_count(), 8);
        assert_eq!(state.indexes[9], EMPTY);
    }

    #[test]
    fn test_super_refill_wins_over_refill() {
        let p = pipeline(
            vec![
                Action::new(ActionKind::SuperShape {
                    shape: Shape::square3x3(),
                    centers: vec![4],
                }),
                Action::new(ActionKind::ClearPayouts),
            ],
            EngineConfig::default(),
        );
        let mut state = p.new_state();
        state.load(&[5, 5, 5, 5, 5, 5, 5, 5, 5, 1, 2, 3, 4, 1, 2]).unwrap();
        let outcome = p.run(&mut state, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(outcome.refill, Some(SpinKind::Super));
    }

    #[test]
    fn test_injection_reevaluates_paylines() {
        let p = pipeline(
            vec![
                Action::new(ActionKind::Paylines(lines_5x3())),
                Action::new(ActionKind::InjectSymbol {
                    symbol: 9,
                    reels: vec![2],
                    multipliers: None,
                }),
            ],
            EngineConfig::default(),
        );
        let mut state = p.new_state();
        // middle row 1 1 5 1 1; only the middle tile of reel 2 is free
        state.load(&[2, 1, 3, 4, 1, 6, 2, 5, 3, 4, 1, 6, 2, 1, 3]).unwrap();
        state.sticky[6] = true;
        state.sticky[8] = true;

        let outcome = p.run(&mut state, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(state.indexes[7], 9);
        assert_eq!(outcome.payouts.len(), 1);
        assert_eq!((outcome.payouts[0].symbol, outcome.payouts[0].count), (1, 5));
        assert_relative_eq!(outcome.total(), 50.0);
        assert_eq!(triggered(&outcome), vec!["inject-symbol", "paylines"]);
    }

    #[test]
    fn test_pre_bonus_needs_continuation() {
        let actions = || {
            vec![
                Action::new(ActionKind::ScatterFreeSpins {
                    symbol: 10,
                    count: 3,
                    extra: Vec::new(),
                    bonus_symbols: None,
                })
                .with_free_spins(8),
                Action::new(ActionKind::FirstMultiplier {
                    level: 1,
                    multiplier: 2.0,
                    flag: None,
                }),
            ]
        };
        let p = pipeline(actions(), EngineConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut state = p.new_state();
        state.load(&[10, 1, 2, 3, 10, 4, 1, 5, 6, 2, 2, 4, 3, 4, 5]).unwrap();
        let outcome = p.run(&mut state, &mut rng);
        assert_eq!(outcome.free_spins, 0);
        assert_relative_eq!(state.multiplier, 1.0);

        state.load(&[10, 1, 2, 3, 10, 4, 1, 5, 6, 10, 2, 4, 3, 4, 5]).unwrap();
        let outcome = p.run(&mut state, &mut rng);
        assert_eq!(outcome.free_spins, 8);
        assert_eq!(state.free_spins, 8);
        assert_relative_eq!(state.multiplier, 2.0);
        assert!(outcome.events.contains(&SpinEvent::FreeSpinsAwarded { count: 8, remaining: 8 }));
        assert_eq!(triggered(&outcome), vec!["scatter-free-spins", "first-multiplier"]);
    }

    #[test]
    fn test_null_sink_still_collects_payouts() {
        let p = pipeline(vec![Action::new(ActionKind::Paylines(lines_5x3()))], EngineConfig::default());
        let mut state = p.new_state();
        state.load(&[1, 2, 3, 1, 5, 6, 1, 2, 3, 1, 5, 6, 1, 2, 3]).unwrap();
        let mut sink = crate::events::NullSink;
        let outcome = p.run_with(&mut state, &mut ChaCha8Rng::seed_from_u64(1), &mut sink);
        assert!(outcome.events.is_empty());
        assert_relative_eq!(outcome.total(), 50.0);
    }
}
