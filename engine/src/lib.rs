//! Island Board Engine
//!
//! A board of floating islands stacked on circular levels and joined by a
//! directed move-graph. The user looks around by tilting the device (or by
//! dragging) and moves between islands with camera flights.
//!
//! # Modules
//!
//! - [`world`] - Procedural board: move-graph, level partition, ring layout, symbols
//! - [`camera`] - Orientation fusion and camera transitions
//! - [`input`] - Platform-agnostic commands and raw samples
//! - [`game`] - The board session, its configuration and host interface
//!
//! # Example
//!
//! ```ignore
//! use island_board_engine::game::{BoardConfig, BoardSession};
//! use island_board_engine::input::BoardCommand;
//!
//! let mut session = BoardSession::new(BoardConfig::default());
//! session.start(&mut host);
//!
//! // Each animation frame
//! session.handle(BoardCommand::Frame, now, &mut host);
//! ```

pub mod camera;
pub mod input;
pub mod world;

// Session layer (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use camera::{OrientationFusion, TransitionStateMachine};
pub use game::{BoardConfig, BoardHost, BoardSession, CameraPose};
pub use input::{BoardCommand, RawOrientation};
pub use world::{BoardWorld, WorldParams};
