//! Browser bindings
//!
//! `WebBoard` wraps a [`BoardSession`] for JavaScript. The page forwards
//! `deviceorientation`, pointer and HUD events, then calls `frame` from
//! `requestAnimationFrame` and applies the returned JSON:
//!
//! ```json
//! { "pose": { ... }, "events": [ { "type": "available_moves", ... } ] }
//! ```
//!
//! Timestamps are `performance.now()` milliseconds.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::{BoardConfig, BoardHost, BoardSession, CameraPose};
use crate::input::{BoardCommand, RawOrientation};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Collaborator call recorded for the page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HostEvent {
    LevelDelta { level: u32 },
    AvailableMoves { node: usize, row: Vec<bool>, symbols: Vec<String> },
    Win { node: usize },
}

/// Queues every collaborator call until the next `frame`.
#[derive(Default)]
struct QueuedHost {
    pose: Option<CameraPose>,
    events: Vec<HostEvent>,
}

impl BoardHost for QueuedHost {
    fn render_frame(&mut self, pose: &CameraPose) {
        self.pose = Some(*pose);
    }

    fn apply_level_delta(&mut self, current_level: u32) {
        self.events.push(HostEvent::LevelDelta { level: current_level });
    }

    fn render_available_moves(&mut self, node: usize, row: &[bool], symbols: &[String]) {
        self.events.push(HostEvent::AvailableMoves {
            node,
            row: row.to_vec(),
            symbols: symbols.to_vec(),
        });
    }

    fn report_win(&mut self, node: usize) {
        self.events.push(HostEvent::Win { node });
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    pose: Option<CameraPose>,
    node: usize,
    level: u32,
    busy: bool,
    events: &'a [HostEvent],
}

#[inline]
fn seconds(now_ms: f64) -> f64 {
    now_ms / 1000.0
}

/// A board session driven from JavaScript.
#[wasm_bindgen]
pub struct WebBoard {
    session: BoardSession,
    host: QueuedHost,
}

#[wasm_bindgen]
impl WebBoard {
    /// Build a board from an optional JSON config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebBoard, JsValue> {
        let config = match config_json {
            Some(json) => BoardConfig::from_json_str(&json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => BoardConfig::default(),
        };
        let mut board = WebBoard {
            session: BoardSession::new(config),
            host: QueuedHost::default(),
        };
        board.session.start(&mut board.host);
        Ok(board)
    }

    pub fn orientation(
        &mut self,
        alpha: Option<f32>,
        beta: Option<f32>,
        gamma: Option<f32>,
        screen_rotation: Option<f32>,
        now_ms: f64,
    ) {
        let sample = RawOrientation {
            alpha,
            beta,
            gamma,
            screen_rotation,
        };
        self.dispatch(BoardCommand::Orientation(sample), now_ms);
    }

    pub fn orientation_changed(&mut self, now_ms: f64) {
        self.dispatch(BoardCommand::OrientationChanged, now_ms);
    }

    pub fn sensor_unavailable(&mut self, now_ms: f64) {
        self.dispatch(BoardCommand::SensorUnavailable, now_ms);
    }

    pub fn pointer_drag(&mut self, dx: f32, dy: f32, now_ms: f64) {
        self.dispatch(BoardCommand::PointerDrag { dx, dy }, now_ms);
    }

    pub fn move_by_symbol(&mut self, symbol: String, now_ms: f64) {
        self.dispatch(BoardCommand::MoveBySymbol { symbol }, now_ms);
    }

    pub fn move_to_column(&mut self, column: usize, now_ms: f64) {
        self.dispatch(BoardCommand::MoveToColumn { column }, now_ms);
    }

    pub fn recenter(&mut self, now_ms: f64) {
        self.dispatch(BoardCommand::Recenter, now_ms);
    }

    /// Advance one animation frame; returns the pose and queued events as JSON.
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        self.dispatch(BoardCommand::Frame, now_ms);
        let output = FrameOutput {
            pose: self.host.pose,
            node: self.session.current_node(),
            level: self.session.current_level(),
            busy: self.session.is_busy(),
            events: &self.host.events,
        };
        let json = serde_json::to_string(&output).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.host.events.clear();
        Ok(json)
    }
}

impl WebBoard {
    fn dispatch(&mut self, command: BoardCommand, now_ms: f64) {
        self.session.handle(command, seconds(now_ms), &mut self.host);
    }
}
