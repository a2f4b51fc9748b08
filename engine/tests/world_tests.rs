//! World Tests - Board Generation Properties
//!
//! Property tests for the move-graph, the level partition and the ring layout.

use std::f32::consts::TAU;

use island_board_engine::world::{
    BalanceParams, BoardWorld, DropWeight, LayoutConfig, LayoutEngine, IslandDims, WorldParams,
    best_partition, build_levels, generate_adjacency, relax_angles,
    weighted_sample_without_replacement,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn weighting() -> impl Strategy<Value = DropWeight> {
    prop_oneof![
        Just(DropWeight::Linear),
        Just(DropWeight::Uniform),
        (0.1f32..0.9).prop_map(|ratio| DropWeight::Geometric { ratio }),
    ]
}

// ============================================================================
// Move-graph
// ============================================================================

proptest! {
    #[test]
    fn prop_every_node_but_last_links_forward(
        size in 1usize..40,
        seed in any::<u64>(),
        max_drop in 0usize..5,
        down_k in 0usize..5,
        weighting in weighting(),
    ) {
        let params = BalanceParams { max_drop, down_k, weighting, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        let adj = generate_adjacency(size, &params, &mut rng);

        prop_assert_eq!(adj.size(), size);
        for i in 0..size.saturating_sub(1) {
            prop_assert!(adj.has_edge(i, i + 1), "missing forward edge {} -> {}", i, i + 1);
        }
        // The last node has no outgoing edge toward itself or beyond
        if size > 0 {
            prop_assert!(!adj.has_edge(size - 1, size - 1));
        }
    }

    #[test]
    fn prop_backward_edges_respect_budget(
        size in 2usize..30,
        seed in any::<u64>(),
        max_drop in 0usize..5,
        down_k in 0usize..5,
    ) {
        let params = BalanceParams { max_drop, down_k, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        let adj = generate_adjacency(size, &params, &mut rng);

        for i in 0..size {
            let backward: Vec<usize> = adj.successors(i).into_iter().filter(|&j| j < i).collect();
            let self_loop = usize::from(adj.has_edge(i, i));
            prop_assert!(backward.len() + self_loop <= down_k.max(self_loop));
            for j in backward {
                prop_assert!(i - j <= max_drop, "drop {} -> {} exceeds {}", i, j, max_drop);
            }
            // Only forward edge is i + 1
            for j in adj.successors(i) {
                prop_assert!(j <= i + 1);
            }
        }
    }

    #[test]
    fn prop_weighted_sample_bounds(
        weights in prop::collection::vec(-1.0f32..3.0, 0..12),
        count in 0usize..15,
        seed in any::<u64>(),
    ) {
        let pool: Vec<(usize, f32)> = weights.iter().copied().enumerate().collect();
        let positive = weights.iter().filter(|&&w| w > 0.0).count();
        let mut rng = StdRng::seed_from_u64(seed);

        let picked = weighted_sample_without_replacement(&pool, count, &mut rng);

        prop_assert_eq!(picked.len(), count.min(positive));
        let mut seen = picked.clone();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), picked.len(), "duplicates in {:?}", picked);
        for idx in picked {
            prop_assert!(weights[idx] > 0.0, "picked non-positive weight at {}", idx);
        }
    }
}

// ============================================================================
// Level partition
// ============================================================================

proptest! {
    #[test]
    fn prop_partition_covers_every_node(size in 1usize..40, max_part in 1usize..8) {
        let levels = build_levels(size, max_part);

        prop_assert_eq!(levels.len(), size);
        prop_assert_eq!(levels.level_of(0), Some(1));
        prop_assert_eq!(levels.counts().iter().sum::<usize>(), size);

        // Levels never decrease with the node index
        let slice = levels.as_slice();
        prop_assert!(slice.windows(2).all(|w| w[0] <= w[1]));

        if size >= 2 {
            let top = levels.level_count();
            prop_assert_eq!(levels.level_of(size - 1), Some(top));
            prop_assert_eq!(levels.nodes_on(top), vec![size - 1]);
            prop_assert_eq!(levels.nodes_on(1), vec![0]);
        }
        let counts = levels.counts();
        if counts.len() > 2 {
            prop_assert!(counts[1..counts.len() - 1].iter().all(|&c| c <= max_part));
        }
    }

    #[test]
    fn prop_best_partition_sums_and_caps(n in 0usize..30, max_part in 1usize..6) {
        let parts = best_partition(n, max_part);
        prop_assert_eq!(parts.iter().sum::<usize>(), n);
        prop_assert!(parts.iter().all(|&p| p >= 1 && p <= max_part));
    }
}

#[test]
fn test_stock_board_levels() {
    let levels = build_levels(7, 4);
    assert_eq!(levels.as_slice(), &[1, 2, 2, 2, 3, 3, 4]);
    assert_eq!(levels.counts(), &[1, 3, 2, 1]);
}

// ============================================================================
// Ring layout
// ============================================================================

proptest! {
    #[test]
    fn prop_relaxed_angles_stay_in_range(
        raw in prop::collection::vec(-10.0f32..10.0, 0..10),
        min_gap in 0.0f32..1.0,
        iterations in 0u32..8,
    ) {
        let mut angles = raw;
        for a in angles.iter_mut() {
            *a = a.rem_euclid(TAU).min(TAU - 1e-4);
        }
        relax_angles(&mut angles, min_gap, iterations);

        prop_assert!(angles.iter().all(|&a| (0.0..TAU).contains(&a)));
        prop_assert!(angles.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_min_angle_never_below_floor(radius in 0.0f32..50.0, island in 0.0f32..3.0) {
        let engine = LayoutEngine::new(
            LayoutConfig::default(),
            IslandDims { radius: island, ..Default::default() },
        );
        prop_assert!(engine.min_angle_required(radius) >= LayoutConfig::default().min_angle_floor);
    }

    #[test]
    fn prop_generated_board_is_consistent(size in 1usize..25, seed in any::<u64>()) {
        let params = WorldParams { size, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        let world = BoardWorld::generate(&params, &mut rng);

        prop_assert_eq!(world.size(), size);
        prop_assert_eq!(world.layout.len(), size);
        prop_assert_eq!(world.symbols.len(), size);
        for node in 0..size {
            let p = world.layout.position_for(node).unwrap();
            let expected_y = (world.level_of(node) - 1) as f32 * params.layout.level_gap;
            prop_assert!((p.y - expected_y).abs() < 1e-4);
            let ring = (p.x * p.x + p.z * p.z).sqrt();
            prop_assert!((ring - params.layout.ring_radius).abs() < 1e-3);
        }
    }
}
