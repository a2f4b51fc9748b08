//! Input Module
//!
//! Platform-agnostic input for the board. Every external event (sensor
//! sample, pointer drag, HUD click, frame tick) is translated into a
//! [`BoardCommand`] and handed to the session's single update function, so a
//! recorded command list replays deterministically.
//!
//! # Example
//!
//! ```rust,ignore
//! use island_board_engine::input::{BoardCommand, RawOrientation};
//!
//! session.handle(BoardCommand::Orientation(RawOrientation::new(30.0, 90.0, 0.0, 0.0)), now, &mut host);
//! session.handle(BoardCommand::MoveBySymbol { symbol: "★".into() }, now, &mut host);
//! session.handle(BoardCommand::Frame, now, &mut host);
//! ```

pub mod pointer;
pub mod sample;

use serde::{Deserialize, Serialize};

pub use pointer::PointerDrag;
pub use sample::RawOrientation;

/// One external event, as consumed by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardCommand {
    /// Device-orientation reading
    Orientation(RawOrientation),
    /// Screen rotated; orientation tracking restarts calibration
    OrientationChanged,
    /// Orientation sensor missing or permission refused; use pointer drags
    SensorUnavailable,
    /// Pointer drag delta in pixels (fallback control)
    PointerDrag { dx: f32, dy: f32 },
    /// HUD button with this symbol was clicked
    MoveBySymbol { symbol: String },
    /// Move request addressed by matrix column
    MoveToColumn { column: usize },
    /// Re-zero the view on the current heading
    Recenter,
    /// Animation frame
    Frame,
}
