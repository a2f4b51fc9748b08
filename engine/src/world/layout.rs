//! Ring Layout
//!
//! Places the islands of each level on a horizontal ring. Levels are stacked
//! `level_gap` apart on Y and every ring shares the same radius.
//!
//! ## Angles
//! Each level is rotated by its own offset (golden angle × level by default) so
//! islands on neighbouring levels do not line up radially. Slots are spread
//! evenly around the ring, jittered, then pushed apart by a few rounds of
//! pairwise relaxation until neighbours are roughly one island footprint apart.
//!
//! The relaxation is a bounded heuristic: it runs a fixed number of rounds and
//! does not test for a fixed point. Crowded rings can still end up tighter than
//! the required minimum.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::partition::LevelAssignment;

/// Golden angle in radians (≈137.5°)
pub const GOLDEN_ANGLE: f32 = PI * 0.763_932; // π(3 − √5)

/// How each level's ring is rotated relative to the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingRotation {
    /// `GOLDEN_ANGLE * level`, deterministic
    GoldenAngle,
    /// Uniform in [0, 2π) per level, drawn once per layout
    Random,
}

impl Default for RingRotation {
    fn default() -> Self {
        RingRotation::GoldenAngle
    }
}

/// Island footprint and eye placement (world units).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandDims {
    /// Footprint radius of one island
    pub radius: f32,
    /// Island height; the walkable top sits at `height / 2` above the node position
    pub height: f32,
    /// Camera height above the island top
    pub eye_lift: f32,
}

impl Default for IslandDims {
    fn default() -> Self {
        Self {
            radius: 0.9,
            height: 1.8,
            eye_lift: 0.25,
        }
    }
}

impl IslandDims {
    /// Offset from a node position to the camera standing on it
    #[inline]
    pub fn eye_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.height * 0.5 + self.eye_lift, 0.0)
    }
}

/// Ring layout parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Ring radius, shared by all levels
    pub ring_radius: f32,
    /// Vertical distance between levels
    pub level_gap: f32,
    /// Angular jitter half-range (radians)
    pub jitter_theta: f32,
    /// Lower bound on the required angular gap (radians)
    pub min_angle_floor: f32,
    /// Multiplier on the footprint-derived gap
    pub min_angle_buffer: f32,
    /// Relaxation rounds
    pub relax_iterations: u32,
    /// Per-level ring rotation
    pub rotation: RingRotation,
    /// Shuffle which node of a level takes which slot
    pub shuffle_within_level: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ring_radius: 8.0,
            level_gap: 4.0,
            jitter_theta: 0.18,
            min_angle_floor: 0.28,
            min_angle_buffer: 1.0,
            relax_iterations: 4,
            rotation: RingRotation::GoldenAngle,
            shuffle_within_level: true,
        }
    }
}

/// Wrap an angle into [0, 2π).
#[inline]
pub fn wrap_tau(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Push circularly-adjacent angles apart until each gap reaches `min_gap`,
/// for at most `iterations` rounds. Angles stay sorted and inside [0, 2π).
pub fn relax_angles(angles: &mut [f32], min_gap: f32, iterations: u32) {
    let count = angles.len();
    angles.sort_by(|a, b| a.total_cmp(b));
    if count < 2 {
        return;
    }

    for _ in 0..iterations {
        for i in 0..count {
            let j = (i + 1) % count;
            let (a, b) = (angles[i], angles[j]);
            let gap = if j == 0 { b + TAU - a } else { b - a };
            if gap < min_gap {
                let push = (min_gap - gap) * 0.5;
                angles[i] = wrap_tau(a - push);
                angles[j] = wrap_tau(b + push);
            }
        }
        angles.sort_by(|a, b| a.total_cmp(b));
    }
}

/// Computed node placement, indexed by node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    positions: Vec<Vec3>,
    angles: Vec<f32>,
}

impl NodeLayout {
    /// Layout from explicit island centers; ring angles are derived from x/z.
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let angles = positions.iter().map(|p| wrap_tau(p.z.atan2(p.x))).collect();
        Self { positions, angles }
    }

    /// Island center of `node`
    #[inline]
    pub fn position_for(&self, node: usize) -> Option<Vec3> {
        self.positions.get(node).copied()
    }

    /// Ring angle of `node` (radians, [0, 2π))
    #[inline]
    pub fn angle_for(&self, node: usize) -> Option<f32> {
        self.angles.get(node).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Ring layout computation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutEngine {
    pub config: LayoutConfig,
    pub island: IslandDims,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, island: IslandDims) -> Self {
        Self { config, island }
    }

    /// Ring radius for `level` (currently the same for every level)
    #[inline]
    pub fn ring_radius(&self, _level: u32) -> f32 {
        self.config.ring_radius
    }

    /// Minimum angular gap between neighbouring islands on a ring of `ring_radius`.
    ///
    /// Never below `min_angle_floor`.
    pub fn min_angle_required(&self, ring_radius: f32) -> f32 {
        let footprint = if ring_radius > 0.0 {
            (2.0 * self.island.radius / ring_radius) * self.config.min_angle_buffer
        } else {
            0.0
        };
        self.config.min_angle_floor.max(footprint)
    }

    /// Rotation offset applied to every slot of `level`.
    pub fn rotation_for_level<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> f32 {
        match self.config.rotation {
            RingRotation::GoldenAngle => wrap_tau(GOLDEN_ANGLE * level as f32),
            RingRotation::Random => rng.gen_range(0.0..TAU),
        }
    }

    /// Slot angles for `count` islands on `level`, sorted ascending in [0, 2π).
    pub fn angles_for_level<R: Rng + ?Sized>(
        &self,
        level: u32,
        count: usize,
        ring_radius: f32,
        rng: &mut R,
    ) -> Vec<f32> {
        if count == 0 {
            return Vec::new();
        }

        let rotation = self.rotation_for_level(level, &mut *rng);
        let jitter = self.config.jitter_theta.abs();
        let sample_jitter = |rng: &mut R| {
            if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            }
        };

        if count == 1 {
            return vec![wrap_tau(rotation + sample_jitter(rng))];
        }

        let mut angles: Vec<f32> = (0..count)
            .map(|k| wrap_tau(TAU * (k as f32 / count as f32) + rotation + sample_jitter(rng)))
            .collect();

        relax_angles(
            &mut angles,
            self.min_angle_required(ring_radius),
            self.config.relax_iterations,
        );
        angles
    }

    /// Place every node of `levels`.
    pub fn layout<R: Rng + ?Sized>(&self, levels: &LevelAssignment, rng: &mut R) -> NodeLayout {
        let mut positions = vec![Vec3::ZERO; levels.len()];
        let mut angles = vec![0.0; levels.len()];

        for level in 1..=levels.level_count() {
            let mut nodes = levels.nodes_on(level);
            let ring_radius = self.ring_radius(level);
            let level_angles = self.angles_for_level(level, nodes.len(), ring_radius, &mut *rng);

            if self.config.shuffle_within_level {
                nodes.shuffle(rng);
            }

            let y = (level - 1) as f32 * self.config.level_gap;
            for (&node, &theta) in nodes.iter().zip(&level_angles) {
                positions[node] = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                angles[node] = theta;
            }
        }

        NodeLayout { positions, angles }
    }
}
