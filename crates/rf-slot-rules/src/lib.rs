//! # rf-slot-rules: Spin-round rules engine
//!
//! Evaluates slot spins against a configured list of actions. A round starts
//! with a full spin and continues through refills and free spins until
//! nothing is pending.
//!
//! ## Features
//!
//! - **Payouts**: paylines, all-paylines (ways), clusters, scatters, wilds
//! - **Staged actions**: grid revision, expansion, clearance, stickiness,
//!   injection, multipliers, round flags and free spin awards
//! - **Cascades**: clear winning tiles, drop floating symbols, refill
//! - **Wild mechanics**: reel expansion, shape transforms, jumping wilds
//! - **Events**: every grid change is reported through an [`EventSink`]
//!
//! ## Architecture
//!
//! ```text
//! SpinRound::play
//!     │
//!     ├── SpinState::spin / cascade::refill   (Spinner + RngCore)
//!     │
//!     v
//! ActionPipeline::run ── Stage::ALL ──> Action::triggered
//!     │                                     │
//!     │                                     ├── evaluator (payouts)
//!     │                                     ├── wilds / cascade
//!     │                                     └── SpinEvent → EventSink
//!     v
//! SpinOutcome (payouts, events, refill, free spins) → RoundOutcome
//! ```

pub mod actions;
pub mod cascade;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod paylines;
pub mod payout;
pub mod pipeline;
pub mod round;
pub mod spinner;
pub mod state;
pub mod symbols;
pub mod weighting;
pub mod wilds;

#[cfg(test)]
pub(crate) mod fixtures;

pub use actions::{Action, ActionContext, ActionKind, ActionResult, Stage};
pub use cascade::CascadeMove;
pub use config::*;
pub use error::*;
pub use events::*;
pub use paylines::*;
pub use payout::*;
pub use pipeline::*;
pub use round::*;
pub use spinner::*;
pub use state::*;
pub use symbols::*;
pub use weighting::*;
pub use wilds::{JumpParams, JumpRecord};
