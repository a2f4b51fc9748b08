//! Config Module
//!
//! Centralized configuration for board generation, view tracking and camera
//! transitions.

pub mod board_config;

pub use board_config::{BoardConfig, BoardConfigError, HudConfig, MAX_BOARD_SIZE};
