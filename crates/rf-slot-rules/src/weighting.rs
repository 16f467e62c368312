//! Weighted draws

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Source of weighted random values (symbol ids, multipliers, flag values).
pub trait WeightedGenerator {
    /// Draw one value
    fn random_index(&self, rng: &mut dyn RngCore) -> u16;

    /// Fill `out` with independent draws
    fn fill_random(&self, rng: &mut dyn RngCore, out: &mut [u16]) {
        for slot in out.iter_mut() {
            *slot = self.random_index(rng);
        }
    }
}

/// Values with integer weights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(u16, u32)>", into = "Vec<(u16, u32)>")]
pub struct Weighting {
    values: Vec<u16>,
    weights: Vec<u32>,
    cumulative: Vec<u64>,
}

impl Weighting {
    /// Build from `(value, weight)` pairs. Zero-weight entries are kept but never drawn.
    pub fn new(entries: &[(u16, u32)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyWeighting);
        }

        let mut total = 0u64;
        let mut cumulative = Vec::with_capacity(entries.len());
        for &(_, weight) in entries {
            total += weight as u64;
            cumulative.push(total);
        }
        if total == 0 {
            return Err(ConfigError::ZeroWeights);
        }

        Ok(Self {
            values: entries.iter().map(|&(v, _)| v).collect(),
            weights: entries.iter().map(|&(_, w)| w).collect(),
            cumulative,
        })
    }

    /// Every value with weight 1
    pub fn uniform(values: &[u16]) -> Result<Self> {
        let entries: Vec<(u16, u32)> = values.iter().map(|&v| (v, 1)).collect();
        Self::new(&entries)
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn total_weight(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Value whose cumulative band contains `roll` (`roll < total_weight`)
    pub fn value_at(&self, roll: u64) -> u16 {
        let ix = self.cumulative.partition_point(|&c| c <= roll);
        self.values[ix.min(self.values.len() - 1)]
    }
}

impl WeightedGenerator for Weighting {
    fn random_index(&self, rng: &mut dyn RngCore) -> u16 {
        let roll = rng.random_range(0..self.total_weight());
        self.value_at(roll)
    }
}

impl TryFrom<Vec<(u16, u32)>> for Weighting {
    type Error = ConfigError;

    fn try_from(entries: Vec<(u16, u32)>) -> Result<Self> {
        Self::new(&entries)
    }
}

impl From<Weighting> for Vec<(u16, u32)> {
    fn from(w: Weighting) -> Self {
        w.values.into_iter().zip(w.weights).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rejects_empty_and_zero() {
        assert_eq!(Weighting::new(&[]), Err(ConfigError::EmptyWeighting));
        assert_eq!(Weighting::new(&[(1, 0), (2, 0)]), Err(ConfigError::ZeroWeights));
    }

    #[test]
    fn test_value_bands() {
        let w = Weighting::new(&[(5, 2), (7, 0), (9, 3)]).unwrap();
        assert_eq!(w.total_weight(), 5);
        assert_eq!(w.value_at(0), 5);
        assert_eq!(w.value_at(1), 5);
        assert_eq!(w.value_at(2), 9);
        assert_eq!(w.value_at(4), 9);
    }

    #[test]
    fn test_draws_follow_weights() {
        let w = Weighting::new(&[(1, 1), (2, 3)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut out = [0u16; 4000];
        w.fill_random(&mut rng, &mut out);

        let ones = out.iter().filter(|&&v| v == 1).count();
        assert!(out.iter().all(|&v| v == 1 || v == 2));
        assert!((800..1200).contains(&ones), "ones = {ones}");
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let w: Weighting = serde_json::from_str("[[3, 10], [4, 20]]").unwrap();
        assert_eq!(w.values(), &[3, 4]);
        assert!(serde_json::from_str::<Weighting>("[]").is_err());
    }
}
