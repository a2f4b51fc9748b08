//! Board Session
//!
//! Central state for one board: the generated world, the view orientation,
//! the camera transition and the HUD order. Every external event arrives as a
//! [`BoardCommand`] through [`BoardSession::handle`]; collaborators are called
//! back through [`BoardHost`].

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::camera::{OrientationFusion, TransitionOutcome, TransitionStateMachine};
use crate::game::config::BoardConfig;
use crate::game::host::{BoardHost, CameraPose};
use crate::input::BoardCommand;
use crate::world::BoardWorld;

/// Island every board starts on
pub const START_NODE: usize = 0;

/// One running board.
pub struct BoardSession {
    config: BoardConfig,
    world: BoardWorld,
    orientation: OrientationFusion,
    transition: TransitionStateMachine,
    camera_position: Vec3,
    /// Symbols last sent to the HUD, in display order
    displayed_moves: Vec<String>,
    /// HUD shuffling
    rng: StdRng,
}

impl BoardSession {
    /// Generate a fresh board from `config`.
    ///
    /// With `config.seed` set, the board and every HUD shuffle are reproducible.
    pub fn new(config: BoardConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let world = BoardWorld::generate(&config.world_params(), &mut rng);
        Self::with_world(config, world, rng)
    }

    /// Run a session on an already built world.
    pub fn with_world(config: BoardConfig, world: BoardWorld, rng: StdRng) -> Self {
        let camera_position = world.eye_position(START_NODE).unwrap_or(Vec3::ZERO);
        Self {
            orientation: OrientationFusion::new(config.orientation),
            transition: TransitionStateMachine::new(config.transition, START_NODE),
            config,
            world,
            camera_position,
            displayed_moves: Vec::new(),
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[inline]
    pub fn world(&self) -> &BoardWorld {
        &self.world
    }

    #[inline]
    pub fn orientation(&self) -> &OrientationFusion {
        &self.orientation
    }

    #[inline]
    pub fn transition(&self) -> &TransitionStateMachine {
        &self.transition
    }

    /// Island the camera stands on
    #[inline]
    pub fn current_node(&self) -> usize {
        self.transition.current()
    }

    #[inline]
    pub fn current_level(&self) -> u32 {
        self.world.level_of(self.current_node())
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.transition.is_busy()
    }

    #[inline]
    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Move symbols in the order the HUD shows them
    #[inline]
    pub fn displayed_moves(&self) -> &[String] {
        &self.displayed_moves
    }

    /// Current camera state for rendering.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.camera_position,
            yaw: self.orientation.render_yaw(),
            pitch: self.orientation.pitch(),
            rotation: self.orientation.rotation(),
        }
    }

    /// Place the camera on the start island and send the initial HUD state.
    pub fn start(&mut self, host: &mut impl BoardHost) {
        if let Some(eye) = self.world.eye_position(self.current_node()) {
            self.camera_position = eye;
        }
        tracing::info!(
            node = self.current_node(),
            level = self.current_level(),
            "board session started"
        );
        host.apply_level_delta(self.current_level());
        self.announce_moves(host);
    }

    /// Apply one external event at time `now` (seconds).
    pub fn handle(&mut self, command: BoardCommand, now: f64, host: &mut impl BoardHost) {
        match command {
            BoardCommand::Orientation(sample) => {
                self.orientation
                    .on_sample(&sample, now, self.transition.is_busy());
            }
            BoardCommand::OrientationChanged => self.orientation.reset(),
            BoardCommand::SensorUnavailable => self.orientation.use_pointer_fallback(),
            BoardCommand::PointerDrag { dx, dy } => {
                if self.transition.is_busy() {
                    tracing::debug!("pointer drag ignored during transition");
                } else {
                    self.orientation.apply_pointer_drag(dx, dy);
                }
            }
            BoardCommand::MoveBySymbol { symbol } => match self.world.symbols.column_for(&symbol) {
                Some(column) => self.request_move(column, now),
                None => tracing::debug!(%symbol, "unknown move symbol"),
            },
            BoardCommand::MoveToColumn { column } => self.request_move(column, now),
            BoardCommand::Recenter => {
                self.orientation.recenter();
                tracing::debug!("view recentered");
            }
            BoardCommand::Frame => self.frame(now, host),
        }
    }

    fn request_move(&mut self, destination: usize, now: f64) {
        if self.transition.is_busy() {
            tracing::debug!(destination, "move ignored, transition in flight");
            return;
        }
        let current = self.current_node();
        if !self.world.adjacency.has_edge(current, destination) {
            tracing::debug!(from = current, to = destination, "move ignored, no edge");
            return;
        }
        self.transition
            .begin(destination, &self.world, &self.orientation, now);
    }

    fn frame(&mut self, now: f64, host: &mut impl BoardHost) {
        let step = self.transition.advance(
            now,
            &self.world,
            &mut self.orientation,
            &mut self.camera_position,
        );
        if let Some(level) = step.snapped_to_level {
            host.apply_level_delta(level);
        }
        if let Some(outcome) = step.completed {
            self.finish_move(outcome, host);
        }
        host.render_frame(&self.pose());
    }

    fn finish_move(&mut self, outcome: TransitionOutcome, host: &mut impl BoardHost) {
        host.apply_level_delta(outcome.level);
        self.announce_moves(host);
        if outcome.won {
            tracing::info!(node = outcome.destination, level = outcome.level, "top level reached");
            host.report_win(outcome.destination);
        }
    }

    fn announce_moves(&mut self, host: &mut impl BoardHost) {
        let node = self.current_node();
        let row = self.world.adjacency.row(node);
        let mut symbols = self.world.symbols.symbols_for_row(row);
        if self.config.hud.shuffle_moves {
            symbols.shuffle(&mut self.rng);
        }
        host.render_available_moves(node, row, &symbols);
        self.displayed_moves = symbols;
    }
}
