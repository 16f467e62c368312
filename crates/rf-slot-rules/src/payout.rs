//! Payout records

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::paylines::PayDirection;
use crate::symbols::SymbolId;

/// Mechanism that produced a payout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayoutKind {
    Payline,
    AllPaylines,
    Cluster,
    Scatter,
    Wild,
    Bonus,
}

/// A single win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub kind: PayoutKind,
    pub symbol: SymbolId,
    /// Matched tile count
    pub count: u8,
    /// Win factor (bet multiple), rounded to two decimals
    pub factor: f64,
    /// Combined multiplier, rounded to two decimals
    pub multiplier: f64,
    pub direction: PayDirection,
    /// Payline id, 0 when not a payline win
    pub payline_id: u8,
    /// Matched row per reel for payline wins
    pub pay_rows: SmallVec<[u8; 8]>,
    /// Matched tile offsets
    pub tiles: Vec<usize>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Payout {
    pub fn new(kind: PayoutKind, symbol: SymbolId, count: u8, factor: f64, multiplier: f64) -> Self {
        Self {
            kind,
            symbol,
            count,
            factor: round2(factor),
            multiplier: round2(multiplier),
            direction: PayDirection::LeftToRight,
            payline_id: 0,
            pay_rows: SmallVec::new(),
            tiles: Vec::new(),
        }
    }

    pub fn with_direction(mut self, direction: PayDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_payline(mut self, id: u8, rows: &[u8]) -> Self {
        self.payline_id = id;
        self.pay_rows = SmallVec::from_slice(rows);
        self
    }

    pub fn with_tiles(mut self, tiles: Vec<usize>) -> Self {
        self.tiles = tiles;
        self
    }

    /// Factor × multiplier
    pub fn total(&self) -> f64 {
        self.factor * self.multiplier
    }
}

/// Sum of all payout totals
pub fn total_payout(payouts: &[Payout]) -> f64 {
    payouts.iter().map(Payout::total).sum()
}
