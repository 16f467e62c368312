//! Rules engine configuration

use rf_slot_grid::GridTopology;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Grid specification (reels × rows, optional per-reel mask)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Maximum number of rows per reel
    pub rows: u8,
    /// Visible rows per reel; `None` for a rectangular grid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Vec<u8>>,
}

impl GridSpec {
    pub fn new(reels: u8, rows: u8) -> Self {
        Self {
            reels,
            rows,
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: Vec<u8>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Standard 5×3
    pub fn standard_5x3() -> Self {
        Self::new(5, 3)
    }

    /// 6×4 hexagonal layout (2-3-4-4-3-2)
    pub fn hexagonal_6x4() -> Self {
        Self::new(6, 4).with_mask(vec![2, 3, 4, 4, 3, 2])
    }

    /// Total offsets in the grid
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }

    /// Build the immutable topology for this grid
    pub fn build(&self) -> Result<GridTopology> {
        let (reels, rows) = (self.reels as usize, self.rows as usize);
        let grid = match &self.mask {
            Some(mask) => GridTopology::with_mask(reels, rows, mask)?,
            None => GridTopology::new(reels, rows)?,
        };
        Ok(grid)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub grid: GridSpec,
    /// Cleared tiles are filled by dropping the symbols above them
    #[serde(default)]
    pub cascading: bool,
    /// Round multiplier only applies to wins that include a wild
    #[serde(default)]
    pub multiplier_needs_wild: bool,
    /// Upper bound on spins (first + free + refills) in one round
    #[serde(default = "default_max_round_spins")]
    pub max_round_spins: u32,
}

fn default_max_round_spins() -> u32 {
    250
}

impl EngineConfig {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn with_cascading(mut self, cascading: bool) -> Self {
        self.cascading = cascading;
        self
    }

    pub fn with_multiplier_needs_wild(mut self, needs_wild: bool) -> Self {
        self.multiplier_needs_wild = needs_wild;
        self
    }

    pub fn with_max_round_spins(mut self, max: u32) -> Self {
        self.max_round_spins = max;
        self
    }

    /// Check the grid and round bound
    pub fn validate(&self) -> Result<()> {
        self.grid.build()?;
        if self.max_round_spins == 0 {
            return Err(ConfigError::InvalidEngine("max_round_spins must be at least 1"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            cascading: false,
            multiplier_needs_wild: false,
            max_round_spins: default_max_round_spins(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_slot_grid::GridError;

    #[test]
    fn test_presets_build() {
        let grid = GridSpec::standard_5x3().build().unwrap();
        assert_eq!(grid.size(), 15);
        let hex = GridSpec::hexagonal_6x4().build().unwrap();
        assert_eq!(hex.valid_count(), 18);
        assert_eq!(GridSpec::hexagonal_6x4().total_positions(), 24);
    }

    #[test]
    fn test_invalid_grid_is_rejected() {
        let err = GridSpec::new(0, 3).build().unwrap_err();
        assert_eq!(err, ConfigError::Grid(GridError::InvalidSize { reels: 0, rows: 3 }));

        let err = GridSpec::new(5, 3).with_mask(vec![3, 3]).build().unwrap_err();
        assert!(matches!(err, ConfigError::Grid(GridError::MaskLength { .. })));
    }

    #[test]
    fn test_engine_defaults_and_validation() {
        let config = EngineConfig::default();
        assert!(!config.cascading);
        assert_eq!(config.max_round_spins, 250);
        assert!(config.validate().is_ok());

        let bad = EngineConfig::default().with_max_round_spins(0);
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidEngine(_))));
    }

    #[test]
    fn test_engine_config_from_json() {
        let json = r#"{
            "grid": { "reels": 6, "rows": 4, "mask": [2, 3, 4, 4, 3, 2] },
            "cascading": true
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert!(config.cascading);
        assert!(!config.multiplier_needs_wild);
        assert_eq!(config.max_round_spins, 250);
        assert_eq!(config.grid, GridSpec::hexagonal_6x4());
        assert!(config.validate().is_ok());
    }
}
