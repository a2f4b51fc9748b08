//! Island Board Demo
//!
//! Run with: `cargo run --bin board_demo [config.json]`
//!
//! Desktop harness for the board session. There is no orientation sensor on a
//! desktop, so the view runs on the pointer fallback from the start. The board
//! state is shown in the window title.
//!
//! Controls:
//! - Left-drag: Look around
//! - 1-9: Take the n-th move shown in the title
//! - Space: Move onto the current island again (when allowed)
//! - R: Recenter view
//! - ESC: Exit
//!
//! Set `RUST_LOG=debug` to see rejected moves and calibration.
//!
//! Desktop only. In the browser the board runs through `WebBoard` in the
//! library; this binary's wasm build is an empty `main`.

#[cfg(not(target_arch = "wasm32"))]
use std::error::Error;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;
#[cfg(not(target_arch = "wasm32"))]
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::PhysicalSize;
#[cfg(not(target_arch = "wasm32"))]
use winit::event::{ElementState, MouseButton, WindowEvent};
#[cfg(not(target_arch = "wasm32"))]
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
#[cfg(not(target_arch = "wasm32"))]
use winit::keyboard::{KeyCode, PhysicalKey};
#[cfg(not(target_arch = "wasm32"))]
use winit::window::{Window, WindowAttributes, WindowId};

use island_board_engine::game::{BoardHost, CameraPose};
#[cfg(not(target_arch = "wasm32"))]
use island_board_engine::game::{BoardConfig, BoardSession};
#[cfg(not(target_arch = "wasm32"))]
use island_board_engine::input::{BoardCommand, PointerDrag};

/// Seconds between title refreshes
#[cfg(not(target_arch = "wasm32"))]
const TITLE_INTERVAL: f32 = 0.1;

/// Collects what the session reports for the title-bar HUD.
#[derive(Default)]
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
struct TitleHud {
    node: usize,
    level: u32,
    moves: Vec<String>,
    won: bool,
    pose: Option<CameraPose>,
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
impl TitleHud {
    fn title(&self) -> String {
        let view = self
            .pose
            .map(|p| format!("yaw {:+.0}° pitch {:+.0}°", p.yaw.to_degrees(), p.pitch.to_degrees()))
            .unwrap_or_default();
        let moves = self
            .moves
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}:{}", i + 1, s))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "Island Board - island {} level {}{} | {} | moves {}",
            self.node,
            self.level,
            if self.won { " (top reached)" } else { "" },
            view,
            moves
        )
    }
}

impl BoardHost for TitleHud {
    fn render_frame(&mut self, pose: &CameraPose) {
        self.pose = Some(*pose);
    }

    fn apply_level_delta(&mut self, current_level: u32) {
        self.level = current_level;
    }

    fn render_available_moves(&mut self, node: usize, _row: &[bool], symbols: &[String]) {
        self.node = node;
        self.moves = symbols.to_vec();
    }

    fn report_win(&mut self, node: usize) {
        self.won = true;
        println!("Island {node} is on the top level. Keep exploring or press ESC.");
    }
}

#[cfg(not(target_arch = "wasm32"))]
struct BoardDemoApp {
    window: Option<Arc<Window>>,
    session: BoardSession,
    hud: TitleHud,
    drag: PointerDrag,
    cursor: (f32, f32),
    started: Instant,
    last_title: f32,
}

#[cfg(not(target_arch = "wasm32"))]
impl BoardDemoApp {
    fn new(config: BoardConfig) -> Self {
        Self {
            window: None,
            session: BoardSession::new(config),
            hud: TitleHud::default(),
            drag: PointerDrag::new(),
            cursor: (0.0, 0.0),
            started: Instant::now(),
            last_title: 0.0,
        }
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn send(&mut self, command: BoardCommand) {
        let now = self.now();
        self.session.handle(command, now, &mut self.hud);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let slot = match key {
            KeyCode::Digit1 => Some(0),
            KeyCode::Digit2 => Some(1),
            KeyCode::Digit3 => Some(2),
            KeyCode::Digit4 => Some(3),
            KeyCode::Digit5 => Some(4),
            KeyCode::Digit6 => Some(5),
            KeyCode::Digit7 => Some(6),
            KeyCode::Digit8 => Some(7),
            KeyCode::Digit9 => Some(8),
            _ => None,
        };
        if let Some(slot) = slot {
            if let Some(symbol) = self.session.displayed_moves().get(slot).cloned() {
                self.send(BoardCommand::MoveBySymbol { symbol });
            }
            return;
        }
        match key {
            KeyCode::KeyR => self.send(BoardCommand::Recenter),
            KeyCode::Space => {
                let column = self.session.current_node();
                self.send(BoardCommand::MoveToColumn { column });
            }
            _ => {}
        }
    }

    fn frame(&mut self) {
        self.send(BoardCommand::Frame);
        let t = self.now() as f32;
        if t - self.last_title >= TITLE_INTERVAL {
            self.last_title = t;
            if let Some(window) = &self.window {
                window.set_title(&self.hud.title());
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ApplicationHandler for BoardDemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title("Island Board")
            .with_inner_size(PhysicalSize::new(1280, 720));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                self.send(BoardCommand::SensorUnavailable);
                self.session.start(&mut self.hud);
            }
            Err(err) => {
                tracing::error!(%err, "failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    if key == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.drag.press(self.cursor.0, self.cursor.1),
                ElementState::Released => self.drag.release(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                if let Some((dx, dy)) = self.drag.move_to(self.cursor.0, self.cursor.1) {
                    self.send(BoardCommand::PointerDrag { dx, dy });
                }
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => BoardConfig::load(&path).inspect_err(|err| {
            tracing::error!(%path, %err, "cannot use board config");
        })?,
        None => BoardConfig::default(),
    };

    println!("=== Island Board ===");
    println!("Left-drag: look | 1-9: move | Space: stay | R: recenter | ESC: exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = BoardDemoApp::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_numbers_moves_in_display_order() {
        let mut hud = TitleHud::default();
        hud.apply_level_delta(2);
        hud.render_available_moves(3, &[false, true, true, false], &["◆".to_string(), "▲".to_string()]);

        let title = hud.title();
        assert!(title.contains("island 3 level 2"), "{title}");
        assert!(title.ends_with("moves 1:◆ 2:▲"), "{title}");
        assert!(!title.contains("top reached"));
    }

    #[test]
    fn test_title_marks_win_and_view() {
        let mut hud = TitleHud::default();
        hud.render_frame(&CameraPose {
            position: glam::Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            rotation: glam::Quat::IDENTITY,
        });
        hud.report_win(6);

        let title = hud.title();
        assert!(title.contains("(top reached)"), "{title}");
        assert!(title.contains("yaw +0° pitch +0°"), "{title}");
    }
}
