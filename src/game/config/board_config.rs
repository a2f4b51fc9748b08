//! Board Configuration
//!
//! Single source of truth for every tunable of a board session. Every section
//! defaults to the stock board, so a JSON file only needs the fields it
//! changes:
//!
//! ```json
//! { "board_size": 10, "transition": { "style": "blur_all" }, "seed": 7 }
//! ```

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{OrientationConfig, TransitionTimings};
use crate::world::{BalanceParams, IslandDims, LayoutConfig, WorldParams};

/// Errors from loading or validating a [`BoardConfig`].
#[derive(Debug, Error)]
pub enum BoardConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Largest board a config may ask for.
///
/// Level products for boards up to this size stay exact in `u128`.
pub const MAX_BOARD_SIZE: usize = 200;

/// Move list presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Shuffle the order of the move buttons after every move
    pub shuffle_moves: bool,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self { shuffle_moves: true }
    }
}

/// Everything a [`BoardSession`](crate::game::BoardSession) is built from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of islands
    pub board_size: usize,
    /// Largest number of islands on one level
    pub max_partition: usize,
    pub balance: BalanceParams,
    pub layout: LayoutConfig,
    pub island: IslandDims,
    pub orientation: OrientationConfig,
    pub transition: TransitionTimings,
    pub hud: HudConfig,
    /// Fixed seed for generation and HUD shuffling; entropy when absent
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let world = WorldParams::default();
        Self {
            board_size: world.size,
            max_partition: world.max_partition,
            balance: world.balance,
            layout: world.layout,
            island: world.island,
            orientation: OrientationConfig::default(),
            transition: TransitionTimings::default(),
            hud: HudConfig::default(),
            seed: None,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, BoardConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BoardConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "loaded board config");
        Ok(config)
    }

    /// Reject values the generator or the camera cannot work with.
    pub fn validate(&self) -> Result<(), BoardConfigError> {
        fn invalid(msg: impl Into<String>) -> Result<(), BoardConfigError> {
            Err(BoardConfigError::Invalid(msg.into()))
        }

        if self.board_size == 0 {
            return invalid("board_size must be at least 1");
        }
        if self.board_size > MAX_BOARD_SIZE {
            return invalid(format!("board_size must be at most {MAX_BOARD_SIZE}"));
        }
        if self.max_partition == 0 {
            return invalid("max_partition must be at least 1");
        }
        let p = self.balance.self_loop_probability;
        if !(0.0..=1.0).contains(&p) {
            return invalid(format!("self_loop_probability {p} outside [0, 1]"));
        }

        let layout = &self.layout;
        if !(layout.ring_radius > 0.0 && layout.ring_radius.is_finite()) {
            return invalid("layout.ring_radius must be positive");
        }
        if !layout.level_gap.is_finite() {
            return invalid("layout.level_gap must be finite");
        }
        // Jitter is drawn from a range of this half-width
        if !(0.0..PI).contains(&layout.jitter_theta) {
            return invalid(format!("layout.jitter_theta {} outside [0, π)", layout.jitter_theta));
        }
        for (name, value) in [
            ("min_angle_floor", layout.min_angle_floor),
            ("min_angle_buffer", layout.min_angle_buffer),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return invalid(format!("layout.{name} must be finite and not negative"));
            }
        }

        let island = &self.island;
        for (name, value) in [("radius", island.radius), ("height", island.height)] {
            if !(value > 0.0 && value.is_finite()) {
                return invalid(format!("island.{name} must be positive"));
            }
        }
        if !island.eye_lift.is_finite() {
            return invalid("island.eye_lift must be finite");
        }

        let o = &self.orientation;
        if !(0.0..=1.0).contains(&o.smoothing) {
            return invalid(format!("orientation.smoothing {} outside [0, 1]", o.smoothing));
        }
        if !(o.calibration_window >= 0.0 && o.calibration_window.is_finite()) {
            return invalid("orientation.calibration_window must be finite and not negative");
        }
        if !(o.pitch_min.is_finite() && o.pitch_max.is_finite()) {
            return invalid("orientation pitch limits must be finite");
        }
        if o.pitch_min > o.pitch_max {
            return invalid("orientation.pitch_min exceeds pitch_max");
        }
        if !o.drag_sensitivity.is_finite() {
            return invalid("orientation.drag_sensitivity must be finite");
        }

        let t = &self.transition;
        for (name, value) in [
            ("blur_duration", t.blur_duration),
            ("horizontal_duration", t.horizontal_duration),
            ("diagonal_base", t.diagonal_base),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return invalid(format!("transition.{name} must be positive"));
            }
        }
        if !(t.diagonal_per_level >= 0.0 && t.diagonal_per_level.is_finite()) {
            return invalid("transition.diagonal_per_level must not be negative");
        }
        Ok(())
    }

    /// Generation inputs derived from this config.
    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            size: self.board_size,
            max_partition: self.max_partition,
            balance: self.balance,
            layout: self.layout,
            island: self.island,
        }
    }
}
