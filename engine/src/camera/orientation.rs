//! Orientation Fusion
//!
//! Turns raw device-orientation samples into a stable view yaw/pitch.
//!
//! ## Pipeline
//! 1. Euler (beta, alpha, -gamma) in YXZ order -> quaternion, corrected from
//!    the device frame (screen facing up) to the world frame (screen facing
//!    the viewer), then un-rotated by the screen rotation.
//! 2. Decompose back to YXZ Euler; Y is the raw yaw, X the raw pitch.
//! 3. Unwrap yaw into a continuous angle so crossing ±π never jumps.
//! 4. Calibrate: average the first ~320 ms into yaw/pitch zero-references.
//! 5. Track: subtract the zero-references and smooth toward the result.
//!
//! While a transition is in flight yaw follows its target without smoothing,
//! so the transition's azimuth compensation is not dragged out by the filter.
//!
//! Without a sensor, pointer drags drive yaw/pitch directly.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::RawOrientation;

/// Tuning for orientation tracking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Exponential smoothing factor per sample (0 = frozen, 1 = no smoothing)
    pub smoothing: f32,
    /// Calibration averaging window in seconds
    pub calibration_window: f32,
    /// Lowest view pitch (radians)
    pub pitch_min: f32,
    /// Highest view pitch (radians)
    pub pitch_max: f32,
    /// Radians per pixel for the pointer fallback
    pub drag_sensitivity: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.08,
            calibration_window: 0.32,
            pitch_min: -PI * 0.75,
            pitch_max: PI * 0.75,
            drag_sensitivity: 0.0045,
        }
    }
}

/// Calibration progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrientationPhase {
    /// No sample seen since the last reset
    Uncalibrated,
    /// Averaging samples into the zero-references
    Calibrating,
    /// Zero-references set
    Tracking,
}

/// Where yaw/pitch come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationSource {
    #[default]
    Sensor,
    /// Swipe fallback when no sensor is available
    Pointer,
}

/// Signed shortest rotation equivalent to `angle`, in [-π, π).
#[inline]
pub fn shortest_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Quaternion for a device orientation (all angles in radians).
pub fn device_quaternion(alpha: f32, beta: f32, gamma: f32, screen_rotation: f32) -> Quat {
    // Euler (beta, alpha, -gamma), order YXZ
    let euler = Quat::from_rotation_y(alpha) * Quat::from_rotation_x(beta) * Quat::from_rotation_z(-gamma);
    // Device frame looks down its z-axis; rotate -90° about X so it looks forward
    let device_to_world = Quat::from_rotation_x(-FRAC_PI_2);
    let screen = Quat::from_axis_angle(Vec3::Z, -screen_rotation);
    (euler * device_to_world * screen).normalize()
}

/// `(yaw, pitch)` of `q` via a YXZ Euler decomposition.
pub fn yaw_pitch_from_quaternion(q: Quat) -> (f32, f32) {
    let m = Mat3::from_quat(q);
    // Row/column naming: m13 = row 1, column 3
    let m13 = m.z_axis.x;
    let m23 = m.z_axis.y;
    let m33 = m.z_axis.z;
    let m11 = m.x_axis.x;
    let m31 = m.x_axis.z;

    let pitch = (-m23.clamp(-1.0, 1.0)).asin();
    let yaw = if m23.abs() < 0.999_999_9 {
        m13.atan2(m33)
    } else {
        (-m31).atan2(m11)
    };
    (yaw, pitch)
}

#[derive(Clone, Copy, Debug, Default)]
struct Calibration {
    started_at: Option<f64>,
    yaw_sum: f64,
    pitch_sum: f64,
    samples: u32,
}

/// Continuous yaw/pitch state fed by sensor samples or pointer drags.
#[derive(Clone, Debug)]
pub struct OrientationFusion {
    pub config: OrientationConfig,
    source: OrientationSource,
    /// Displayed yaw (radians, unwrapped)
    yaw: f32,
    /// Displayed pitch (radians)
    pitch: f32,
    prev_raw_yaw: Option<f32>,
    continuous_yaw: f32,
    yaw_zero: Option<f32>,
    pitch_zero: Option<f32>,
    /// Manual offset kept by recenter so the view does not jump
    yaw_offset: f32,
    last_raw_pitch: f32,
    calibration: Calibration,
    /// Bumped whenever the zero-references are replaced outright
    zero_epoch: u32,
}

impl Default for OrientationFusion {
    fn default() -> Self {
        Self::new(OrientationConfig::default())
    }
}

impl OrientationFusion {
    pub fn new(config: OrientationConfig) -> Self {
        Self {
            config,
            source: OrientationSource::Sensor,
            yaw: 0.0,
            pitch: 0.0,
            prev_raw_yaw: None,
            continuous_yaw: 0.0,
            yaw_zero: None,
            pitch_zero: None,
            yaw_offset: 0.0,
            last_raw_pitch: 0.0,
            calibration: Calibration::default(),
            zero_epoch: 0,
        }
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unwrapped sensor yaw
    #[inline]
    pub fn continuous_yaw(&self) -> f32 {
        self.continuous_yaw
    }

    #[inline]
    pub fn yaw_zero(&self) -> Option<f32> {
        self.yaw_zero
    }

    #[inline]
    pub fn pitch_zero(&self) -> Option<f32> {
        self.pitch_zero
    }

    /// Changes whenever calibration, reset or recenter replaces the zero-references.
    #[inline]
    pub fn zero_epoch(&self) -> u32 {
        self.zero_epoch
    }

    #[inline]
    pub fn source(&self) -> OrientationSource {
        self.source
    }

    pub fn phase(&self) -> OrientationPhase {
        if self.yaw_zero.is_some() && self.pitch_zero.is_some() {
            OrientationPhase::Tracking
        } else if self.calibration.samples > 0 {
            OrientationPhase::Calibrating
        } else {
            OrientationPhase::Uncalibrated
        }
    }

    /// Switch to the pointer fallback. Sensor samples are ignored from now on.
    pub fn use_pointer_fallback(&mut self) {
        if self.source != OrientationSource::Pointer {
            tracing::info!("orientation sensor unavailable, using pointer drag");
        }
        self.source = OrientationSource::Pointer;
    }

    /// Feed one sensor sample taken at `now` (seconds).
    ///
    /// `transition_active` makes yaw follow its target immediately. Returns
    /// whether the displayed yaw or pitch changed.
    pub fn on_sample(&mut self, sample: &RawOrientation, now: f64, transition_active: bool) -> bool {
        if self.source != OrientationSource::Sensor {
            return false;
        }

        let (alpha, beta, gamma, screen) = sample.to_radians();
        let q = device_quaternion(alpha, beta, gamma, screen);
        let (raw_yaw, raw_pitch) = yaw_pitch_from_quaternion(q);

        let prev = self.prev_raw_yaw.unwrap_or(raw_yaw);
        self.continuous_yaw += shortest_angle(raw_yaw - prev);
        self.prev_raw_yaw = Some(raw_yaw);
        self.last_raw_pitch = raw_pitch;

        let (prev_yaw, prev_pitch) = (self.yaw, self.pitch);

        match (self.yaw_zero, self.pitch_zero) {
            (Some(yaw_zero), Some(pitch_zero)) => {
                let yaw_target = self.continuous_yaw - yaw_zero + self.yaw_offset;
                let pitch_target =
                    (raw_pitch - pitch_zero).clamp(self.config.pitch_min, self.config.pitch_max);

                self.yaw = if transition_active {
                    yaw_target
                } else {
                    lerp(self.yaw, yaw_target, self.config.smoothing)
                };
                self.pitch = lerp(self.pitch, pitch_target, self.config.smoothing);
            }
            _ => {
                self.accumulate_calibration(raw_pitch, now);
                // Relax toward the neutral view while calibrating
                self.yaw = lerp(self.yaw, 0.0, self.config.smoothing);
                self.pitch = lerp(self.pitch, 0.0, self.config.smoothing);
            }
        }

        self.yaw != prev_yaw || self.pitch != prev_pitch
    }

    fn accumulate_calibration(&mut self, raw_pitch: f32, now: f64) {
        let started_at = *self.calibration.started_at.get_or_insert(now);
        self.calibration.yaw_sum += f64::from(self.continuous_yaw);
        self.calibration.pitch_sum += f64::from(raw_pitch);
        self.calibration.samples += 1;

        if now - started_at >= f64::from(self.config.calibration_window) {
            let n = f64::from(self.calibration.samples);
            let yaw_zero = (self.calibration.yaw_sum / n) as f32;
            let pitch_zero = (self.calibration.pitch_sum / n) as f32;
            self.yaw_zero = Some(yaw_zero);
            self.pitch_zero = Some(pitch_zero);
            self.zero_epoch = self.zero_epoch.wrapping_add(1);
            tracing::debug!(
                yaw_zero,
                pitch_zero,
                samples = self.calibration.samples,
                "orientation calibrated"
            );
            self.calibration = Calibration::default();
        }
    }

    /// Screen rotated: forget everything and calibrate again.
    pub fn reset(&mut self) {
        self.prev_raw_yaw = None;
        self.continuous_yaw = 0.0;
        self.yaw_zero = None;
        self.pitch_zero = None;
        self.yaw_offset = 0.0;
        self.calibration = Calibration::default();
        self.zero_epoch = self.zero_epoch.wrapping_add(1);
        tracing::debug!("orientation reset, recalibrating");
    }

    /// Re-zero on the current heading without moving the view.
    pub fn recenter(&mut self) {
        self.yaw_zero = Some(self.continuous_yaw);
        self.yaw_offset = self.yaw;
        self.pitch_zero = Some(self.last_raw_pitch);
        self.calibration = Calibration::default();
        self.zero_epoch = self.zero_epoch.wrapping_add(1);
    }

    /// Shift the zero-reference by `delta` and the displayed yaw by `-delta`.
    ///
    /// Used by transitions to cancel the heading change caused by moving the
    /// camera around the origin.
    pub fn compensate(&mut self, delta: f32) {
        if let Some(zero) = self.yaw_zero.as_mut() {
            *zero += delta;
        }
        self.yaw -= delta;
    }

    /// Overwrite the yaw zero-reference, if one is set.
    pub fn set_yaw_zero(&mut self, value: f32) {
        if let Some(zero) = self.yaw_zero.as_mut() {
            *zero = value;
        }
    }

    /// Pointer fallback: apply a drag of `(dx, dy)` pixels.
    ///
    /// Ignored while the sensor drives the view. Returns whether anything changed.
    pub fn apply_pointer_drag(&mut self, dx: f32, dy: f32) -> bool {
        if self.source != OrientationSource::Pointer {
            return false;
        }
        let s = self.config.drag_sensitivity;
        self.yaw -= dx * s;
        self.pitch = (self.pitch - dy * s).clamp(self.config.pitch_min, self.config.pitch_max);
        dx != 0.0 || dy != 0.0
    }

    /// Displayed yaw wrapped to [-π, π) for the renderer.
    #[inline]
    pub fn render_yaw(&self) -> f32 {
        shortest_angle(self.yaw)
    }

    /// Camera rotation (yaw about Y, then pitch about X).
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.render_yaw()) * Quat::from_rotation_x(self.pitch)
    }

    /// View direction. yaw = pitch = 0 looks down -Z.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
