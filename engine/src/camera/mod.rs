//! Camera Module
//!
//! View orientation from device sensors (or pointer drags) and camera moves
//! between islands. Window-system agnostic: only camera state and math.

pub mod orientation;
pub mod transition;

pub use orientation::{
    OrientationConfig, OrientationFusion, OrientationPhase, OrientationSource,
    device_quaternion, shortest_angle, yaw_pitch_from_quaternion,
};
pub use transition::{
    ActiveTransition, TransitionKind, TransitionOutcome, TransitionStateMachine,
    TransitionStep, TransitionStyle, TransitionTimings, azimuth_to_origin, cosine_ease,
};
