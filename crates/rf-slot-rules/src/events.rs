//! Spin events
//!
//! Everything an action does to the grid is reported through an [`EventSink`].
//! The pipeline collects events into a `Vec<SpinEvent>`; callers that stream
//! results elsewhere can supply their own sink.

use serde::{Deserialize, Serialize};

use crate::actions::{ActionResult, Stage};
use crate::cascade::CascadeMove;
use crate::symbols::SymbolId;
use crate::wilds::JumpRecord;

/// Observable outcome of a pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SpinEvent {
    /// An action (or one of its alternates) triggered
    ActionTriggered {
        name: String,
        stage: Stage,
        result: ActionResult,
    },
    /// Tiles rewritten by a grid revision
    GridRevised { symbol: SymbolId, tiles: Vec<usize> },
    /// Reels filled with a symbol
    Expanded { symbol: SymbolId, reels: Vec<usize> },
    /// Shape transform around trigger symbols
    Transformed {
        trigger: SymbolId,
        substitute: SymbolId,
        tiles: usize,
    },
    Cleared { tiles: Vec<usize> },
    CascadeMoves { moves: Vec<CascadeMove> },
    Refilled { tiles: Vec<usize> },
    Jumped { jumps: Vec<JumpRecord> },
    Injected { symbol: SymbolId, tiles: Vec<usize> },
    /// Sticky tiles after the change
    StickyChanged { tiles: Vec<usize> },
    MultiplierChanged { level: usize, multiplier: f64 },
    RoundFlagChanged { flag: usize, value: i32 },
    FreeSpinsAwarded { count: u32, remaining: u32 },
}

/// Receiver for spin events
pub trait EventSink {
    fn record(&mut self, event: SpinEvent);
}

impl EventSink for Vec<SpinEvent> {
    fn record(&mut self, event: SpinEvent) {
        self.push(event);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: SpinEvent) {}
}
