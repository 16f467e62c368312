//! Grid fill collaborators

use rand::RngCore;

use crate::error::{ConfigError, Result};
use crate::symbols::{SymbolId, SymbolSet};
use crate::weighting::{WeightedGenerator, Weighting};

/// Produces symbols for initial spins and refills.
pub trait Spinner {
    /// Draw a symbol for a tile on the given reel
    fn symbol_for(&self, reel: usize, rng: &mut dyn RngCore) -> SymbolId;
}

/// Spinner drawing every reel from its own weighting
#[derive(Debug, Clone)]
pub struct WeightedSpinner {
    reels: Vec<Weighting>,
}

impl WeightedSpinner {
    /// One weighting per reel
    pub fn new(reels: Vec<Weighting>) -> Result<Self> {
        if reels.is_empty() {
            return Err(ConfigError::MissingParameter("reel weightings"));
        }
        Ok(Self { reels })
    }

    /// The same weighting on every reel
    pub fn uniform_reels(weighting: Weighting, reels: usize) -> Result<Self> {
        Self::new(vec![weighting; reels.max(1)])
    }

    /// Check that every drawable value is a known symbol
    pub fn validate(&self, symbols: &SymbolSet) -> Result<()> {
        for weighting in &self.reels {
            for &value in weighting.values() {
                let id = SymbolId::try_from(value).map_err(|_| ConfigError::InvalidSymbol(u8::MAX))?;
                if !symbols.contains(id) {
                    return Err(ConfigError::UnknownSymbol(id));
                }
            }
        }
        Ok(())
    }
}

impl Spinner for WeightedSpinner {
    fn symbol_for(&self, reel: usize, rng: &mut dyn RngCore) -> SymbolId {
        let weighting = &self.reels[reel.min(self.reels.len() - 1)];
        weighting.random_index(rng) as SymbolId
    }
}
