//! Spin actions
//!
//! An [`Action`] is one configured rule: a closed [`ActionKind`] describing
//! what it does, the [`Stage`] it runs in and the [`ActionResult`] reported
//! when it triggers. Actions may carry an alternate that is tried when the
//! action itself does not trigger, which makes mutually exclusive rules
//! (e.g. 5, 4 or 3 scatters) a simple chain.
//!
//! ## Architecture
//!
//! ```text
//! Action::triggered(state, ctx)
//!     │
//!     ├── fire(kind)  ── mutates the state, records events, adds payouts
//!     │     │
//!     │     └── true  → Some(self)
//!     │
//!     └── false → alternate.triggered(...)  (recursive, None at the end)
//! ```
//!
//! Alternate chains must not contain cycles; [`Action::with_alternate`]
//! takes ownership, so a cycle can only be built by unsafe code.

mod clear;
mod inject;
mod multiplier;
mod revise;
mod round_flag;
mod scatter;
mod shape;
mod sticky;
mod wild;

use rand::RngCore;
use rf_slot_grid::{GridTopology, Shape};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::evaluator::{all_paylines, cluster, payline};
use crate::events::{EventSink, SpinEvent};
use crate::paylines::PaylineSet;
use crate::payout::Payout;
use crate::state::{ROUND_FLAGS, SpinState};
use crate::symbols::SymbolId;
use crate::weighting::Weighting;
use crate::wilds::JumpParams;

// ═══════════════════════════════════════════════════════════════════════════════
// STAGES & RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ReviseGrid,
    TestGrid,
    ExpandBefore,
    RegularPayouts,
    TestClearance,
    ExpandAfter,
    TestStickiness,
    Injection,
    ExtraPayouts,
    AwardBonuses,
    PreBonus,
}

impl Stage {
    pub const ALL: [Stage; 11] = [
        Stage::ReviseGrid,
        Stage::TestGrid,
        Stage::ExpandBefore,
        Stage::RegularPayouts,
        Stage::TestClearance,
        Stage::ExpandAfter,
        Stage::TestStickiness,
        Stage::Injection,
        Stage::ExtraPayouts,
        Stage::AwardBonuses,
        Stage::PreBonus,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// What a triggered action reports to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Processed,
    Payout,
    FreeSpins,
    /// Empty tiles must be refilled
    Refill,
    /// Refill around a super shape
    SuperRefill,
    Sticky,
    Multiplier,
    Multipliers,
    SymbolsInjected,
    WildsJumped,
    GridModified,
    Expanded,
    RoundFlag,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Collaborators and collected output for triggering actions
pub struct ActionContext<'a> {
    rng: &'a mut dyn RngCore,
    sink: &'a mut dyn EventSink,
    payouts: Vec<Payout>,
    refill: bool,
}

impl<'a> ActionContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, sink: &'a mut dyn EventSink) -> Self {
        Self {
            rng,
            sink,
            payouts: Vec::new(),
            refill: false,
        }
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    pub fn record(&mut self, event: SpinEvent) {
        self.sink.record(event);
    }

    /// Payouts added since the last call
    pub fn take_payouts(&mut self) -> Vec<Payout> {
        std::mem::take(&mut self.payouts)
    }

    /// True when an action left tiles that need a refill regardless of its result tag
    pub fn refill_requested(&self) -> bool {
        self.refill
    }

    pub(crate) fn request_refill(&mut self) {
        self.refill = true;
    }

    pub(crate) fn add_payouts(&mut self, payouts: Vec<Payout>) {
        self.payouts.extend(payouts);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACTION KINDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything an action can do. Reels and offsets are 0-based.
#[derive(Debug, Clone)]
pub enum ActionKind {
    // ─── regular payouts ───
    Paylines(PaylineSet),
    AllPaylines {
        highest: bool,
    },
    Clusters {
        min_count: u8,
    },

    // ─── scatters ───
    /// Fixed factor when at least `count` scatters landed
    ScatterPayout {
        symbol: SymbolId,
        count: u8,
        factor: f64,
    },
    /// Pay from the symbol's scatter table
    ScatterPays {
        symbol: SymbolId,
        min_count: u8,
    },
    /// Award the action's free spins; `extra` symbols (e.g. wild scatters)
    /// count towards the total, `bonus_symbols` draws the round bonus symbol.
    ScatterFreeSpins {
        symbol: SymbolId,
        count: u8,
        extra: Vec<SymbolId>,
        bonus_symbols: Option<Weighting>,
    },
    /// Pay the round bonus symbol by the number of reels holding it, then expand it
    BonusScatter {
        lines: u8,
    },

    // ─── wilds ───
    WildPayout {
        symbol: SymbolId,
        count: u8,
        factor: f64,
    },
    WildExpansion {
        symbol: SymbolId,
        count: u8,
        need_hero: bool,
        lock: bool,
    },
    /// Rewrite the shape around each wild with the round sticky symbol
    WildTransform {
        symbol: SymbolId,
        shape: Shape,
    },
    JumpingWilds(JumpParams),

    // ─── grid shapes ───
    SuperShape {
        shape: Shape,
        centers: Vec<usize>,
    },
    ShapeRefill {
        symbol: SymbolId,
        shape: Shape,
        centers: Vec<usize>,
    },

    // ─── clearance ───
    ClearPayouts,
    ExplodingBombs {
        shape: Shape,
    },

    // ─── stickiness ───
    StickySymbol {
        symbol: SymbolId,
        reels: Vec<usize>,
    },
    StickySymbols {
        symbols: Vec<SymbolId>,
    },
    BestSymbolSticky,
    ResetSticky,

    // ─── multipliers ───
    /// Multiply sticky `symbol` tile multipliers when a non-sticky `trigger` lands
    GridMultipliers {
        symbol: SymbolId,
        trigger: SymbolId,
        multiply: u16,
        max: u16,
    },
    FirstMultiplier {
        level: usize,
        multiplier: f64,
        flag: Option<usize>,
    },
    /// Advance the progress level by the trigger count; `multipliers[level - 1]` applies
    MultiplierScale {
        trigger: SymbolId,
        first_level: usize,
        multipliers: Vec<f64>,
        flag: Option<usize>,
    },

    // ─── injection ───
    InjectSymbol {
        symbol: SymbolId,
        reels: Vec<usize>,
        multipliers: Option<Weighting>,
    },
    InjectFromEdge {
        symbol: SymbolId,
        steps: u8,
        multipliers: Option<Weighting>,
    },
    /// Grow a cluster of `min..=max` tiles around an anchor. Without a
    /// configured symbol the anchor's symbol (or the best wild symbol) is used.
    InjectCluster {
        symbol: Option<SymbolId>,
        min: u8,
        max: u8,
        anchors: Vec<usize>,
    },

    // ─── round flags ───
    RoundFlagDraw {
        flag: usize,
        weights: Weighting,
    },
    RoundFlagIncrease {
        flag: usize,
    },
    RoundFlagDecrease {
        flag: usize,
    },
    RoundFlagSet {
        flag: usize,
        value: i32,
    },
    RoundFlagSymbolUsed {
        flag: usize,
        symbol: SymbolId,
    },
    RoundFlagSymbolCount {
        flag: usize,
        symbol: SymbolId,
    },
    RoundFlagsReset {
        flags: Vec<usize>,
    },

    // ─── grid revision ───
    GenerateSymbol {
        symbol: SymbolId,
        chances: Vec<f64>,
        reels: Vec<usize>,
        allow_dupes: bool,
        allow_old: bool,
        multipliers: Option<Weighting>,
    },
    DedupeSymbol {
        symbol: SymbolId,
        reels: Vec<usize>,
        replacements: Weighting,
    },
}

impl ActionKind {
    /// Default name, stage and result tag
    fn defaults(&self) -> (&'static str, Stage, ActionResult) {
        use ActionResult as R;
        use Stage as S;
        match self {
            Self::Paylines(_) => ("paylines", S::RegularPayouts, R::Payout),
            Self::AllPaylines { .. } => ("all-paylines", S::RegularPayouts, R::Payout),
            Self::Clusters { .. } => ("clusters", S::RegularPayouts, R::Payout),
            Self::ScatterPayout { .. } => ("scatter-payout", S::ExtraPayouts, R::Payout),
            Self::ScatterPays { .. } => ("scatter-pays", S::ExtraPayouts, R::Payout),
            Self::ScatterFreeSpins { .. } => ("scatter-free-spins", S::AwardBonuses, R::FreeSpins),
            Self::BonusScatter { .. } => ("bonus-scatter", S::AwardBonuses, R::Payout),
            Self::WildPayout { .. } => ("wild-payout", S::ExtraPayouts, R::Payout),
            Self::WildExpansion { .. } => ("wild-expansion", S::ExpandBefore, R::Expanded),
            Self::WildTransform { .. } => ("wild-transform", S::ExpandBefore, R::GridModified),
            Self::JumpingWilds(_) => ("jumping-wilds", S::TestClearance, R::WildsJumped),
            Self::SuperShape { .. } => ("super-shape", S::TestGrid, R::SuperRefill),
            Self::ShapeRefill { .. } => ("shape-refill", S::TestClearance, R::Refill),
            Self::ClearPayouts => ("clear-payouts", S::TestClearance, R::Refill),
            Self::ExplodingBombs { .. } => ("exploding-bombs", S::TestClearance, R::Refill),
            Self::StickySymbol { .. } => ("sticky-symbol", S::TestStickiness, R::Sticky),
            Self::StickySymbols { .. } => ("sticky-symbols", S::TestStickiness, R::Sticky),
            Self::BestSymbolSticky => ("best-symbol-sticky", S::TestStickiness, R::Sticky),
            Self::ResetSticky => ("reset-sticky", S::TestStickiness, R::Sticky),
            Self::GridMultipliers { .. } => ("grid-multipliers", S::TestGrid, R::Multipliers),
            Self::FirstMultiplier { .. } => ("first-multiplier", S::PreBonus, R::Multiplier),
            Self::MultiplierScale { .. } => ("multiplier-scale", S::TestGrid, R::Multiplier),
            Self::InjectSymbol { .. } => ("inject-symbol", S::Injection, R::SymbolsInjected),
            Self::InjectFromEdge { .. } => ("inject-from-edge", S::Injection, R::SymbolsInjected),
            Self::InjectCluster { .. } => ("inject-cluster", S::Injection, R::SymbolsInjected),
            Self::RoundFlagDraw { .. } => ("round-flag-draw", S::PreBonus, R::RoundFlag),
            Self::RoundFlagIncrease { .. } => ("round-flag-increase", S::ReviseGrid, R::RoundFlag),
            Self::RoundFlagDecrease { .. } => ("round-flag-decrease", S::ReviseGrid, R::RoundFlag),
            Self::RoundFlagSet { .. } => ("round-flag-set", S::ReviseGrid, R::RoundFlag),
            Self::RoundFlagSymbolUsed { .. } => ("round-flag-symbol-used", S::AwardBonuses, R::RoundFlag),
            Self::RoundFlagSymbolCount { .. } => ("round-flag-symbol-count", S::AwardBonuses, R::RoundFlag),
            Self::RoundFlagsReset { .. } => ("round-flags-reset", S::ReviseGrid, R::RoundFlag),
            Self::GenerateSymbol { .. } => ("generate-symbol", S::ReviseGrid, R::GridModified),
            Self::DedupeSymbol { .. } => ("dedupe-symbol", S::ReviseGrid, R::GridModified),
        }
    }

    /// True for kinds that produce payout records
    pub fn can_payout(&self) -> bool {
        matches!(
            self,
            Self::Paylines(_)
                | Self::AllPaylines { .. }
                | Self::Clusters { .. }
                | Self::ScatterPayout { .. }
                | Self::ScatterPays { .. }
                | Self::BonusScatter { .. }
                | Self::WildPayout { .. }
        )
    }

    /// Symbols the kind refers to
    pub fn symbols(&self) -> Vec<SymbolId> {
        match self {
            Self::ScatterPayout { symbol, .. }
            | Self::ScatterPays { symbol, .. }
            | Self::WildPayout { symbol, .. }
            | Self::WildExpansion { symbol, .. }
            | Self::WildTransform { symbol, .. }
            | Self::ShapeRefill { symbol, .. }
            | Self::StickySymbol { symbol, .. }
            | Self::InjectSymbol { symbol, .. }
            | Self::InjectFromEdge { symbol, .. }
            | Self::RoundFlagSymbolUsed { symbol, .. }
            | Self::RoundFlagSymbolCount { symbol, .. }
            | Self::GenerateSymbol { symbol, .. } => vec![*symbol],
            Self::ScatterFreeSpins {
                symbol,
                extra,
                bonus_symbols,
                ..
            } => {
                let mut out = vec![*symbol];
                out.extend(extra);
                if let Some(weights) = bonus_symbols {
                    out.extend(weights.values().iter().map(|&v| v as SymbolId));
                }
                out
            }
            Self::GridMultipliers { symbol, trigger, .. } => vec![*symbol, *trigger],
            Self::MultiplierScale { trigger, .. } => vec![*trigger],
            Self::StickySymbols { symbols } => symbols.clone(),
            Self::JumpingWilds(params) => params.symbols().to_vec(),
            Self::InjectCluster { symbol, .. } => symbol.iter().copied().collect(),
            Self::DedupeSymbol {
                symbol, replacements, ..
            } => {
                let mut out = vec![*symbol];
                out.extend(replacements.values().iter().map(|&v| v as SymbolId));
                out
            }
            _ => Vec::new(),
        }
    }

    /// Check the parameters against the grid
    pub fn validate(&self, grid: &GridTopology) -> Result<()> {
        fn invalid(action: &'static str, reason: &'static str) -> ConfigError {
            ConfigError::InvalidParameter { action, reason }
        }
        let check_reels = |action: &'static str, reels: &[usize]| {
            if reels.iter().any(|&reel| reel >= grid.reels()) {
                return Err(invalid(action, "reel out of range"));
            }
            Ok(())
        };
        let check_flag = |action: &'static str, flag: usize| {
            if flag >= ROUND_FLAGS {
                return Err(invalid(action, "round flag out of range"));
            }
            Ok(())
        };

        match self {
            Self::ScatterPayout { count, factor, .. } | Self::WildPayout { count, factor, .. } => {
                if *count == 0 {
                    return Err(invalid("fixed payout", "count must be at least 1"));
                }
                if *factor <= 0.0 {
                    return Err(invalid("fixed payout", "factor must be positive"));
                }
            }
            Self::ScatterFreeSpins { count, .. } | Self::WildExpansion { count, .. } if *count == 0 => {
                return Err(invalid("symbol count", "count must be at least 1"));
            }
            Self::BonusScatter { lines } if *lines == 0 => {
                return Err(invalid("bonus scatter", "lines must be at least 1"));
            }
            Self::SuperShape { shape, centers } | Self::ShapeRefill { shape, centers, .. } => {
                if centers.is_empty() {
                    return Err(ConfigError::MissingParameter("shape centers"));
                }
                if centers.iter().any(|&c| !grid.is_valid_offset(c) || shape.place(grid, c).is_none()) {
                    return Err(invalid("grid shape", "shape does not fit around a center"));
                }
            }
            Self::StickySymbol { reels, .. } => check_reels("sticky symbol", reels)?,
            Self::StickySymbols { symbols } if symbols.is_empty() => {
                return Err(ConfigError::MissingParameter("sticky symbols"));
            }
            Self::GridMultipliers { multiply, max, .. } => {
                if *multiply < 2 {
                    return Err(invalid("grid multipliers", "multiply must be at least 2"));
                }
                if max < multiply {
                    return Err(invalid("grid multipliers", "max below multiply"));
                }
            }
            Self::FirstMultiplier { multiplier, flag, .. } => {
                if *multiplier <= 0.0 {
                    return Err(invalid("first multiplier", "multiplier must be positive"));
                }
                if let Some(flag) = flag {
                    check_flag("first multiplier", *flag)?;
                }
            }
            Self::MultiplierScale {
                first_level,
                multipliers,
                flag,
                ..
            } => {
                if multipliers.is_empty() {
                    return Err(ConfigError::MissingParameter("multiplier list"));
                }
                if *first_level == 0 || *first_level > multipliers.len() {
                    return Err(invalid("multiplier scale", "first level outside the list"));
                }
                if let Some(flag) = flag {
                    check_flag("multiplier scale", *flag)?;
                }
            }
            Self::InjectSymbol { reels, .. } => check_reels("inject symbol", reels)?,
            Self::InjectFromEdge { steps, .. } => {
                if *steps == 0 || grid.tiles_from_edge(*steps) == 0 {
                    return Err(invalid("inject from edge", "no tiles at that distance"));
                }
            }
            Self::InjectCluster { min, max, anchors, .. } => {
                if *min == 0 || max < min {
                    return Err(invalid("inject cluster", "size range is empty"));
                }
                if anchors.iter().any(|&a| !grid.is_valid_offset(a)) {
                    return Err(invalid("inject cluster", "anchor outside the grid"));
                }
            }
            Self::RoundFlagDraw { flag, .. }
            | Self::RoundFlagIncrease { flag }
            | Self::RoundFlagDecrease { flag }
            | Self::RoundFlagSet { flag, .. }
            | Self::RoundFlagSymbolUsed { flag, .. }
            | Self::RoundFlagSymbolCount { flag, .. } => check_flag("round flag", *flag)?,
            Self::RoundFlagsReset { flags } => {
                for &flag in flags {
                    check_flag("round flags reset", flag)?;
                }
            }
            Self::GenerateSymbol { chances, reels, .. } => {
                if chances.is_empty() {
                    return Err(ConfigError::MissingParameter("generate chances"));
                }
                if chances.iter().any(|&c| !(0.0..=100.0).contains(&c)) {
                    return Err(invalid("generate symbol", "chance outside 0-100"));
                }
                check_reels("generate symbol", reels)?;
            }
            Self::DedupeSymbol { reels, .. } => check_reels("dedupe symbol", reels)?,
            _ => {}
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACTION
// ═══════════════════════════════════════════════════════════════════════════════

/// A configured rule
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    stage: Stage,
    result: ActionResult,
    kind: ActionKind,
    alternate: Option<Box<Action>>,
    free_spins: u32,
}

impl Action {
    /// New action with the kind's default name, stage and result
    pub fn new(kind: ActionKind) -> Self {
        let (name, stage, result) = kind.defaults();
        Self {
            name: name.to_string(),
            stage,
            result,
            kind,
            alternate: None,
            free_spins: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_result(mut self, result: ActionResult) -> Self {
        self.result = result;
        self
    }

    /// Free spins awarded whenever this action triggers
    pub fn with_free_spins(mut self, spins: u32) -> Self {
        self.free_spins = spins;
        self
    }

    /// Action tried when this one does not trigger; appended to the end of the chain
    pub fn with_alternate(mut self, alternate: Action) -> Self {
        match self.alternate.take() {
            Some(existing) => self.alternate = Some(Box::new(existing.with_alternate(alternate))),
            None => self.alternate = Some(Box::new(alternate)),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn result(&self) -> ActionResult {
        self.result
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn free_spins(&self) -> u32 {
        self.free_spins
    }

    pub fn alternate(&self) -> Option<&Action> {
        self.alternate.as_deref()
    }

    pub fn can_payout(&self) -> bool {
        self.kind.can_payout()
    }

    /// Validate this action and its alternates
    pub fn validate(&self, grid: &GridTopology) -> Result<()> {
        self.kind.validate(grid)?;
        if self.result == ActionResult::FreeSpins && self.free_spins == 0 {
            return Err(ConfigError::InvalidParameter {
                action: "free spins",
                reason: "award must be at least one spin",
            });
        }
        match &self.alternate {
            Some(alternate) => alternate.validate(grid),
            None => Ok(()),
        }
    }

    /// Symbols referenced anywhere in the chain
    pub fn symbols(&self) -> Vec<SymbolId> {
        let mut out = self.kind.symbols();
        if let Some(alternate) = &self.alternate {
            out.extend(alternate.symbols());
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Test the action and apply its effect. Returns the action in the chain
    /// that triggered, or `None` when none did.
    pub fn triggered(&self, state: &mut SpinState, ctx: &mut ActionContext<'_>) -> Option<&Action> {
        if self.fire(state, ctx) {
            log::debug!("Action '{}' triggered ({:?})", self.name, self.result);
            return Some(self);
        }
        log::trace!("Action '{}' not triggered", self.name);
        self.alternate.as_deref()?.triggered(state, ctx)
    }

    /// Evaluate a payout action without any other side effect than the
    /// payout marks. Follows the alternate chain.
    pub fn payout(&self, state: &mut SpinState) -> Option<(&Action, Vec<Payout>)> {
        match self.pay(state) {
            Some(payouts) => Some((self, payouts)),
            None => self.alternate.as_deref()?.payout(state),
        }
    }

    fn pay(&self, state: &mut SpinState) -> Option<Vec<Payout>> {
        let payouts = match &self.kind {
            ActionKind::Paylines(lines) => payline::evaluate(state, lines),
            ActionKind::AllPaylines { highest } => all_paylines::evaluate(state, *highest),
            ActionKind::Clusters { min_count } => cluster::evaluate(state, *min_count),
            ActionKind::ScatterPayout { symbol, count, factor } => {
                vec![scatter::fixed_payout(state, *symbol, *count, *factor)?]
            }
            ActionKind::ScatterPays { symbol, min_count } => {
                vec![crate::evaluator::scatter::payout(state, *symbol, *min_count)?]
            }
            ActionKind::BonusScatter { lines } => vec![scatter::bonus_payout(state, *lines)?],
            ActionKind::WildPayout { symbol, count, factor } => {
                vec![wild::fixed_payout(state, *symbol, *count, *factor)?]
            }
            _ => return None,
        };
        (!payouts.is_empty()).then_some(payouts)
    }

    fn fire(&self, state: &mut SpinState, ctx: &mut ActionContext<'_>) -> bool {
        if self.can_payout() {
            let Some(payouts) = self.pay(state) else {
                return false;
            };
            if let ActionKind::BonusScatter { .. } = self.kind {
                scatter::expand_bonus(state, ctx);
            }
            ctx.add_payouts(payouts);
            return true;
        }

        match &self.kind {
            ActionKind::ScatterFreeSpins {
                symbol,
                count,
                extra,
                bonus_symbols,
            } => scatter::free_spins(state, ctx, *symbol, *count, extra, bonus_symbols.as_ref()),

            ActionKind::WildExpansion {
                symbol,
                count,
                need_hero,
                lock,
            } => wild::expansion(state, ctx, *symbol, *count, *need_hero, *lock),
            ActionKind::WildTransform { symbol, shape } => wild::transform(state, ctx, *symbol, shape),
            ActionKind::JumpingWilds(params) => wild::jumping(state, ctx, params),

            ActionKind::SuperShape { shape, centers } => shape::super_shape(state, ctx, shape, centers),
            ActionKind::ShapeRefill { symbol, shape, centers } => {
                shape::shape_refill(state, ctx, *symbol, shape, centers)
            }

            ActionKind::ClearPayouts => clear::clear_payouts(state, ctx),
            ActionKind::ExplodingBombs { shape } => clear::exploding_bombs(state, ctx, shape),

            ActionKind::StickySymbol { symbol, reels } => sticky::sticky_symbols(state, ctx, &[*symbol], reels),
            ActionKind::StickySymbols { symbols } => sticky::sticky_symbols(state, ctx, symbols, &[]),
            ActionKind::BestSymbolSticky => sticky::best_symbol(state, ctx),
            ActionKind::ResetSticky => sticky::reset(state, ctx),

            ActionKind::GridMultipliers {
                symbol,
                trigger,
                multiply,
                max,
            } => multiplier::grid_multipliers(state, *symbol, *trigger, *multiply, *max),
            ActionKind::FirstMultiplier { level, multiplier, flag } => {
                multiplier::first(state, ctx, *level, *multiplier, *flag)
            }
            ActionKind::MultiplierScale {
                trigger,
                first_level,
                multipliers,
                flag,
            } => multiplier::scale(state, ctx, *trigger, *first_level, multipliers, *flag),

            ActionKind::InjectSymbol {
                symbol,
                reels,
                multipliers,
            } => inject::single(state, ctx, *symbol, reels, multipliers.as_ref()),
            ActionKind::InjectFromEdge {
                symbol,
                steps,
                multipliers,
            } => inject::from_edge(state, ctx, *symbol, *steps, multipliers.as_ref()),
            ActionKind::InjectCluster {
                symbol,
                min,
                max,
                anchors,
            } => inject::cluster(state, ctx, *symbol, *min, *max, anchors),

            ActionKind::RoundFlagDraw { flag, weights } => round_flag::draw(state, ctx, *flag, weights),
            ActionKind::RoundFlagIncrease { flag } => round_flag::increase(state, ctx, *flag),
            ActionKind::RoundFlagDecrease { flag } => round_flag::decrease(state, ctx, *flag),
            ActionKind::RoundFlagSet { flag, value } => round_flag::set(state, ctx, *flag, *value),
            ActionKind::RoundFlagSymbolUsed { flag, symbol } => round_flag::symbol_used(state, ctx, *flag, *symbol),
            ActionKind::RoundFlagSymbolCount { flag, symbol } => {
                round_flag::symbol_count(state, ctx, *flag, *symbol)
            }
            ActionKind::RoundFlagsReset { flags } => round_flag::reset(state, ctx, flags),

            ActionKind::GenerateSymbol {
                symbol,
                chances,
                reels,
                allow_dupes,
                allow_old,
                multipliers,
            } => revise::generate(
                state,
                ctx,
                revise::Generate {
                    symbol: *symbol,
                    chances,
                    reels,
                    allow_dupes: *allow_dupes,
                    allow_old: *allow_old,
                    multipliers: multipliers.as_ref(),
                },
            ),
            ActionKind::DedupeSymbol {
                symbol,
                reels,
                replacements,
            } => revise::dedupe(state, ctx, *symbol, reels, replacements),

            // payout kinds are handled above
            _ => false,
        }
    }
}

/// Sticky offsets, for events
pub(crate) fn sticky_tiles(state: &SpinState) -> Vec<usize> {
    (0..state.sticky.len()).filter(|&o| state.sticky[o]).collect()
}
