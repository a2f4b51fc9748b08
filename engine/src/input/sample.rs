//! Raw Orientation Samples
//!
//! One device-orientation reading as delivered by the platform. Every field is
//! optional because browsers routinely leave some of them out; missing or
//! non-finite fields read as zero.

use serde::{Deserialize, Serialize};

/// Device orientation in degrees, plus the current screen rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrientation {
    /// Rotation about the device z-axis (compass heading), degrees
    pub alpha: Option<f32>,
    /// Front-to-back tilt, degrees
    pub beta: Option<f32>,
    /// Left-to-right tilt, degrees
    pub gamma: Option<f32>,
    /// Screen rotation relative to the natural orientation (0, 90, 180, 270)
    pub screen_rotation: Option<f32>,
}

#[inline]
fn field_radians(value: Option<f32>) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).to_radians()
}

impl RawOrientation {
    /// Sample with every field present.
    pub fn new(alpha: f32, beta: f32, gamma: f32, screen_rotation: f32) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
            screen_rotation: Some(screen_rotation),
        }
    }

    /// `(alpha, beta, gamma, screen_rotation)` in radians, missing fields as zero.
    pub fn to_radians(&self) -> (f32, f32, f32, f32) {
        (
            field_radians(self.alpha),
            field_radians(self.beta),
            field_radians(self.gamma),
            field_radians(self.screen_rotation),
        )
    }
}
