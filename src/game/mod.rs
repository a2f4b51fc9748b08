//! Game Module
//!
//! The board session that ties world generation, orientation and camera
//! transitions together, plus its configuration and the host-side interface.

pub mod config;
pub mod host;
pub mod state;

pub use config::{BoardConfig, BoardConfigError, HudConfig, MAX_BOARD_SIZE};
pub use host::{BoardHost, CameraPose};
pub use state::BoardSession;
