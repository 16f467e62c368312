//! Round orchestration: first spin, refills and free spins

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::cascade;
use crate::events::SpinEvent;
use crate::payout::Payout;
use crate::pipeline::{ActionPipeline, SpinOutcome};
use crate::spinner::Spinner;
use crate::state::{SpinKind, SpinState};

/// Every spin of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub spins: Vec<SpinOutcome>,
    pub total: f64,
    pub free_spins_awarded: u32,
    /// The round hit the spin limit with a continuation still pending
    pub truncated: bool,
}

impl RoundOutcome {
    pub fn payouts(&self) -> impl Iterator<Item = &Payout> {
        self.spins.iter().flat_map(|s| s.payouts.iter())
    }
}

/// Plays rounds through one pipeline
pub struct SpinRound<'p> {
    pipeline: &'p ActionPipeline,
}

impl<'p> SpinRound<'p> {
    pub fn new(pipeline: &'p ActionPipeline) -> Self {
        Self { pipeline }
    }

    /// Play a full round.
    ///
    /// After each spin a pending refill is served first (only empty tiles are
    /// drawn), then a remaining free spin (full spin). The round ends when
    /// neither is pending or after `max_round_spins` spins.
    pub fn play(&self, state: &mut SpinState, spinner: &dyn Spinner, rng: &mut dyn RngCore) -> RoundOutcome {
        let max_spins = self.pipeline.config().max_round_spins as usize;

        state.reset_round();
        state.spin(spinner, rng);

        let mut spins: Vec<SpinOutcome> = Vec::new();
        let mut refilled: Option<Vec<usize>> = None;
        let mut truncated = false;

        loop {
            let mut outcome = self.pipeline.run(state, rng);
            if let Some(tiles) = refilled.take() {
                outcome.events.insert(0, SpinEvent::Refilled { tiles });
            }
            let refill = outcome.refill;
            spins.push(outcome);

            if refill.is_none() && state.free_spins == 0 {
                break;
            }
            if spins.len() >= max_spins {
                log::warn!(
                    "Round stopped after {} spins ({} free spin(s) left, refill {:?})",
                    spins.len(),
                    state.free_spins,
                    refill
                );
                truncated = true;
                break;
            }

            match refill {
                Some(kind) => {
                    state.kind = kind;
                    refilled = Some(cascade::refill(state, spinner, rng));
                }
                None => {
                    state.free_spins -= 1;
                    state.kind = SpinKind::Free;
                    state.spin(spinner, rng);
                }
            }
        }

        let total = spins.iter().map(SpinOutcome::total).sum();
        let free_spins_awarded = spins.iter().map(|s| s.free_spins).sum();
        log::info!(
            "Round: {} spin(s), total {:.2}, {} free spin(s) awarded{}",
            spins.len(),
            total,
            free_spins_awarded,
            if truncated { ", truncated" } else { "" }
        );
        RoundOutcome {
            spins,
            total,
            free_spins_awarded,
            truncated,
        }
    }
}
