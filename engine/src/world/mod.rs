//! World Module
//!
//! Procedural board generation: the move-graph, the level partition, the ring
//! layout and the symbol map. Everything here is generated once per board and
//! stays immutable afterwards.
//!
//! ## Default Board
//! Seven islands on four levels (1, 3, 2, 1 islands), an eight-unit ring and
//! four units between levels.

pub mod adjacency;
pub mod layout;
pub mod partition;
pub mod symbols;

use glam::Vec3;
use rand::Rng;

pub use adjacency::{
    AdjacencyMatrix, BalanceParams, DropWeight, generate_adjacency, generate_adjacency_with,
    weighted_sample_without_replacement,
};
pub use layout::{
    GOLDEN_ANGLE, IslandDims, LayoutConfig, LayoutEngine, NodeLayout, RingRotation, relax_angles,
    wrap_tau,
};
pub use partition::{LevelAssignment, best_partition, build_levels, enumerate_partitions};
pub use symbols::{BASE_SYMBOLS, SymbolColumnMap};

/// Fog bands the renderer distinguishes; deltas beyond this share the last band.
pub const MAX_FOG_BAND: u32 = 3;

/// Generation inputs for one board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldParams {
    /// Number of islands
    pub size: usize,
    /// Largest number of islands on one level
    pub max_partition: usize,
    pub balance: BalanceParams,
    pub layout: LayoutConfig,
    pub island: IslandDims,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            size: 7,
            max_partition: 4,
            balance: BalanceParams::default(),
            layout: LayoutConfig::default(),
            island: IslandDims::default(),
        }
    }
}

/// Everything generated for one board.
#[derive(Clone, Debug)]
pub struct BoardWorld {
    pub adjacency: AdjacencyMatrix,
    pub levels: LevelAssignment,
    pub layout: NodeLayout,
    pub symbols: SymbolColumnMap,
    pub island: IslandDims,
}

impl BoardWorld {
    /// Generate a board. All randomness is drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(params: &WorldParams, rng: &mut R) -> Self {
        let symbols = SymbolColumnMap::shuffled(params.size, &mut *rng);
        let adjacency = generate_adjacency(params.size, &params.balance, &mut *rng);
        let levels = build_levels(params.size, params.max_partition);
        let layout = LayoutEngine::new(params.layout, params.island).layout(&levels, &mut *rng);

        tracing::info!(
            size = params.size,
            levels = levels.level_count(),
            edges = adjacency.edge_count(),
            "generated board"
        );

        Self {
            adjacency,
            levels,
            layout,
            symbols,
            island: params.island,
        }
    }

    /// Assemble a board from pre-built parts.
    pub fn from_parts(
        adjacency: AdjacencyMatrix,
        levels: LevelAssignment,
        layout: NodeLayout,
        symbols: SymbolColumnMap,
        island: IslandDims,
    ) -> Self {
        Self {
            adjacency,
            levels,
            layout,
            symbols,
            island,
        }
    }

    /// Number of islands
    #[inline]
    pub fn size(&self) -> usize {
        self.adjacency.size()
    }

    /// Level of `node`; 0 for unknown nodes.
    #[inline]
    pub fn level_of(&self, node: usize) -> u32 {
        self.levels.level_of(node).unwrap_or(0)
    }

    /// Highest level
    #[inline]
    pub fn max_level(&self) -> u32 {
        self.levels.level_count()
    }

    /// Whether standing on `node` wins the board
    #[inline]
    pub fn is_goal(&self, node: usize) -> bool {
        node < self.size() && self.level_of(node) == self.max_level()
    }

    /// Camera position when standing on `node`.
    pub fn eye_position(&self, node: usize) -> Option<Vec3> {
        self.layout
            .position_for(node)
            .map(|p| p + self.island.eye_offset())
    }

    /// `|level(node) - current_level|`
    #[inline]
    pub fn level_delta(&self, node: usize, current_level: u32) -> u32 {
        self.level_of(node).abs_diff(current_level)
    }

    /// Level delta clamped to the renderer's fog bands.
    #[inline]
    pub fn fog_band(&self, node: usize, current_level: u32) -> u32 {
        self.level_delta(node, current_level).min(MAX_FOG_BAND)
    }
}
