//! Camera Transitions
//!
//! Moves the camera from the current island to a destination island. Only one
//! transition runs at a time; requests while busy are dropped.
//!
//! ## Kinds
//! - **Self** (destination == current): a short blur. At its midpoint the
//!   camera snaps to the destination eye; the rest of the effect plays out
//!   over the new view.
//! - **Horizontal** (same level): cosine-eased flight over a fixed duration.
//! - **Diagonal** (different level): the same flight, lengthened per level
//!   crossed.
//!
//! ## Azimuth compensation
//! Moving around the ring changes the bearing from the camera to the world
//! origin. The before/after bearing difference `d` is computed once; as the
//! flight progresses the yaw zero-reference advances by `d·ease(t)` and the
//! displayed yaw by `-d·ease(t)`, so the apparent heading stays continuous.
//! Completion snaps both to the exact final values.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::orientation::{OrientationFusion, shortest_angle};
use crate::world::BoardWorld;

/// Which visual path moves use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    /// Self moves blur, other moves fly
    #[default]
    Animated,
    /// Every move blurs and snaps
    BlurAll,
}

/// Transition durations (seconds).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTimings {
    /// Full length of the blur effect; the snap happens at half
    pub blur_duration: f32,
    /// Flight time between islands on the same level
    pub horizontal_duration: f32,
    /// Base flight time between levels
    pub diagonal_base: f32,
    /// Extra flight time per level crossed
    pub diagonal_per_level: f32,
    pub style: TransitionStyle,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            blur_duration: 0.3,
            horizontal_duration: 0.6,
            diagonal_base: 0.45,
            diagonal_per_level: 0.3,
            style: TransitionStyle::Animated,
        }
    }
}

impl TransitionTimings {
    /// Duration of a move of `kind` crossing `level_delta` levels.
    pub fn duration_for(&self, kind: TransitionKind, level_delta: u32) -> f32 {
        if self.style == TransitionStyle::BlurAll {
            return self.blur_duration;
        }
        match kind {
            TransitionKind::SelfMove => self.blur_duration,
            TransitionKind::Horizontal => self.horizontal_duration,
            TransitionKind::Diagonal => self
                .horizontal_duration
                .max(self.diagonal_base + self.diagonal_per_level * level_delta as f32),
        }
    }

    /// Whether moves of `kind` use the blur-and-snap path.
    #[inline]
    pub fn blurs(&self, kind: TransitionKind) -> bool {
        self.style == TransitionStyle::BlurAll || kind == TransitionKind::SelfMove
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Destination is the current island
    SelfMove,
    /// Destination shares the current level
    Horizontal,
    /// Destination is on another level
    Diagonal,
}

impl TransitionKind {
    pub fn classify(world: &BoardWorld, current: usize, destination: usize) -> Self {
        if destination == current {
            TransitionKind::SelfMove
        } else if world.level_of(destination) == world.level_of(current) {
            TransitionKind::Horizontal
        } else {
            TransitionKind::Diagonal
        }
    }
}

/// Cosine ease-in-out on [0, 1].
#[inline]
pub fn cosine_ease(t: f32) -> f32 {
    0.5 - 0.5 * (PI * t.clamp(0.0, 1.0)).cos()
}

/// Yaw that faces the world origin from `position` (yaw 0 looks down -Z).
#[inline]
pub fn azimuth_to_origin(position: Vec3) -> f32 {
    position.x.atan2(position.z)
}

/// A transition in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveTransition {
    pub kind: TransitionKind,
    pub origin: usize,
    pub destination: usize,
    pub started_at: f64,
    pub duration: f32,
    from_eye: Vec3,
    to_eye: Vec3,
    blur: bool,
    /// Total azimuth shift `d`
    azimuth_delta: f32,
    /// Portion of `d` already handed to the orientation
    applied: f32,
    /// Yaw zero-reference at start, with the epoch it belongs to
    zero_start: Option<(f32, u32)>,
    snapped: bool,
}

impl ActiveTransition {
    /// Progress in [0, 1] at `now`.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.started_at) / f64::from(self.duration)) as f32).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn azimuth_delta(&self) -> f32 {
        self.azimuth_delta
    }

    fn compensate_to(&mut self, amount: f32, orientation: &mut OrientationFusion) {
        orientation.compensate(amount - self.applied);
        self.applied = amount;
    }
}

/// A transition that just finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub kind: TransitionKind,
    pub origin: usize,
    pub destination: usize,
    /// Level of the destination
    pub level: u32,
    /// Destination is on the top level
    pub won: bool,
}

/// What one `advance` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionStep {
    /// Blur midpoint reached: camera snapped onto this level
    pub snapped_to_level: Option<u32>,
    pub completed: Option<TransitionOutcome>,
}

/// Idle / Busy state for camera moves between islands.
#[derive(Clone, Debug)]
pub struct TransitionStateMachine {
    pub timings: TransitionTimings,
    current: usize,
    active: Option<ActiveTransition>,
}

impl TransitionStateMachine {
    pub fn new(timings: TransitionTimings, start_node: usize) -> Self {
        Self {
            timings,
            current: start_node,
            active: None,
        }
    }

    /// Island the camera stands on (the origin while a flight is in progress).
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    pub fn active(&self) -> Option<&ActiveTransition> {
        self.active.as_ref()
    }

    /// Start moving to `destination` at `now`.
    ///
    /// Returns `None` (and changes nothing) while busy or when either end has
    /// no position.
    pub fn begin(
        &mut self,
        destination: usize,
        world: &BoardWorld,
        orientation: &OrientationFusion,
        now: f64,
    ) -> Option<TransitionKind> {
        if self.active.is_some() {
            tracing::debug!(destination, "transition busy, move ignored");
            return None;
        }
        let from_eye = world.eye_position(self.current)?;
        let to_eye = world.eye_position(destination)?;

        let kind = TransitionKind::classify(world, self.current, destination);
        let level_delta = world.level_delta(destination, world.level_of(self.current));
        let duration = self.timings.duration_for(kind, level_delta);
        let azimuth_delta = shortest_angle(azimuth_to_origin(to_eye) - azimuth_to_origin(from_eye));

        tracing::info!(
            from = self.current,
            to = destination,
            ?kind,
            duration,
            "transition started"
        );

        self.active = Some(ActiveTransition {
            kind,
            origin: self.current,
            destination,
            started_at: now,
            duration,
            from_eye,
            to_eye,
            blur: self.timings.blurs(kind),
            azimuth_delta,
            applied: 0.0,
            zero_start: orientation.yaw_zero().map(|z| (z, orientation.zero_epoch())),
            snapped: false,
        });
        Some(kind)
    }

    /// Advance the transition in flight to `now`, moving `camera` and
    /// compensating `orientation`.
    pub fn advance(
        &mut self,
        now: f64,
        world: &BoardWorld,
        orientation: &mut OrientationFusion,
        camera: &mut Vec3,
    ) -> TransitionStep {
        let mut step = TransitionStep::default();
        let Some(mut active) = self.active.take() else {
            return step;
        };

        let t = active.progress(now);
        let d = active.azimuth_delta;

        if active.blur {
            if !active.snapped && t >= 0.5 {
                *camera = active.to_eye;
                active.compensate_to(d, orientation);
                active.snapped = true;
                self.current = active.destination;
                step.snapped_to_level = Some(world.level_of(active.destination));
            }
        } else {
            *camera = active.from_eye.lerp(active.to_eye, cosine_ease(t));
            active.compensate_to(d * cosine_ease(t), orientation);
        }

        if t < 1.0 {
            self.active = Some(active);
            return step;
        }

        // Land exactly on the analytic end state
        *camera = active.to_eye;
        active.compensate_to(d, orientation);
        if let Some((zero, epoch)) = active.zero_start {
            if epoch == orientation.zero_epoch() {
                orientation.set_yaw_zero(zero + d);
            }
        }
        self.current = active.destination;

        let level = world.level_of(active.destination);
        let outcome = TransitionOutcome {
            kind: active.kind,
            origin: active.origin,
            destination: active.destination,
            level,
            won: world.is_goal(active.destination),
        };
        tracing::info!(node = outcome.destination, level, won = outcome.won, "transition finished");
        step.completed = Some(outcome);
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_ease_endpoints() {
        assert_eq!(cosine_ease(0.0), 0.0);
        assert!((cosine_ease(0.5) - 0.5).abs() < 1e-6);
        assert!((cosine_ease(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_ease(-1.0), 0.0);
    }

    #[test]
    fn test_azimuth_faces_origin() {
        // From +Z the origin is straight down -Z: yaw 0
        assert!(azimuth_to_origin(Vec3::new(0.0, 3.0, 8.0)).abs() < 1e-6);
        // From +X the origin lies toward -X: yaw +90°
        assert!((azimuth_to_origin(Vec3::new(8.0, 0.0, 0.0)) - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_durations() {
        let timings = TransitionTimings::default();
        assert_eq!(timings.duration_for(TransitionKind::SelfMove, 0), 0.3);
        assert_eq!(timings.duration_for(TransitionKind::Horizontal, 0), 0.6);
        // 0.45 + 0.3 * 2 = 1.05
        assert!((timings.duration_for(TransitionKind::Diagonal, 2) - 1.05).abs() < 1e-6);
        // Short diagonal floors at the horizontal time
        let quick = TransitionTimings {
            diagonal_base: 0.1,
            diagonal_per_level: 0.1,
            ..Default::default()
        };
        assert_eq!(quick.duration_for(TransitionKind::Diagonal, 1), 0.6);
    }

    #[test]
    fn test_blur_all_style() {
        let timings = TransitionTimings {
            style: TransitionStyle::BlurAll,
            ..Default::default()
        };
        assert!(timings.blurs(TransitionKind::Diagonal));
        assert_eq!(timings.duration_for(TransitionKind::Diagonal, 3), 0.3);
        assert!(!TransitionTimings::default().blurs(TransitionKind::Horizontal));
    }
}
