//! Host Interface
//!
//! What the session asks of its surroundings: drawing, HUD and win reporting.
//! The native demo, the wasm wrapper and the integration tests each provide
//! their own implementation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Camera state handed to the renderer each frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    /// Displayed yaw wrapped to [-π, π)
    pub yaw: f32,
    pub pitch: f32,
    pub rotation: Quat,
}

impl CameraPose {
    /// View direction
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Collaborators driven by [`BoardSession`](super::BoardSession).
pub trait BoardHost {
    /// Draw one frame from `pose`.
    fn render_frame(&mut self, pose: &CameraPose);

    /// The camera now stands on `current_level`; refresh per-level visuals
    /// (fog bands, highlights).
    fn apply_level_delta(&mut self, current_level: u32);

    /// Show the moves available from `node`. `row` is the node's adjacency row
    /// and `symbols` the reachable symbols in display order.
    fn render_available_moves(&mut self, node: usize, row: &[bool], symbols: &[String]);

    /// `node` is on the top level.
    fn report_win(&mut self, node: usize);
}
