//! Page-level tunables. Defaults mirror the stock page: a 300px board that
//! shrinks on narrow screens, difficulties 3x3 to 5x5, one tick per second.

use crate::error::ConfigurationError;
use crate::grid::GridSize;

/// Smallest board the layout will produce regardless of viewport width.
pub const MIN_BOARD_PX: f64 = 60.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PuzzleConfig {
    /// Upper bound for the board side in CSS pixels.
    pub max_board_px: f64,
    /// Horizontal space reserved around the board on narrow viewports.
    pub viewport_padding_px: f64,
    /// Vertical space between board and tray.
    pub tray_gap_px: f64,
    pub default_grid: u8,
    /// Grid sizes offered by the difficulty selector.
    pub difficulties: Vec<u8>,
    pub tick_ms: u32,
    pub completion_notice_delay_ms: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            max_board_px: 300.0,
            viewport_padding_px: 40.0,
            tray_gap_px: 16.0,
            default_grid: 3,
            difficulties: vec![3, 4, 5],
            tick_ms: 1000,
            completion_notice_delay_ms: 100,
        }
    }
}

impl PuzzleConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.difficulties.is_empty() {
            return Err(ConfigurationError::NoDifficulties);
        }
        for &n in &self.difficulties {
            GridSize::new(n.into())?;
        }
        if !self.difficulties.contains(&self.default_grid) {
            return Err(ConfigurationError::UnsupportedDifficulty(self.default_grid));
        }
        if !(self.max_board_px.is_finite() && self.max_board_px > 0.0) {
            return Err(ConfigurationError::Malformed(format!(
                "max_board_px must be positive, got {}",
                self.max_board_px
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigurationError::Malformed("tick_ms must be non-zero".into()));
        }
        Ok(())
    }

    /// Grid size used before the player touches the difficulty selector.
    pub fn default_grid_size(&self) -> Result<GridSize, ConfigurationError> {
        GridSize::new(self.default_grid.into())
    }

    /// Accepts `size` only when it is one of the offered difficulties.
    pub fn difficulty(&self, size: GridSize) -> Result<GridSize, ConfigurationError> {
        if self.difficulties.contains(&size.get()) {
            Ok(size)
        } else {
            Err(ConfigurationError::UnsupportedDifficulty(size.get()))
        }
    }

    /// Parses a (possibly partial) JSON object; missing fields keep defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| ConfigurationError::Malformed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
