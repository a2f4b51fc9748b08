//! Adjacency Generation
//!
//! Builds the directed move-graph of the board. Every non-terminal node gets a
//! guaranteed forward edge `i -> i+1`, an optional self-loop ("stall"), and a
//! weighted handful of backward edges ("drops") toward nearby lower indices.
//!
//! The forward edge makes the last node reachable from every node, no matter
//! what the random draws do.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weight assigned to a backward candidate `k` steps below the current node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropWeight {
    /// `max_drop + 1 - k`: short drops are more likely than long ones
    Linear,
    /// Every candidate weighs 1
    Uniform,
    /// `ratio^(k-1)`
    Geometric { ratio: f32 },
}

impl Default for DropWeight {
    fn default() -> Self {
        DropWeight::Linear
    }
}

impl DropWeight {
    /// Evaluate the weight of a drop of `k` nodes given the configured `max_drop`.
    pub fn weight(&self, k: usize, max_drop: usize) -> f32 {
        match *self {
            DropWeight::Linear => (max_drop + 1) as f32 - k as f32,
            DropWeight::Uniform => 1.0,
            DropWeight::Geometric { ratio } => ratio.powi(k.saturating_sub(1) as i32),
        }
    }
}

/// Balance between forward progress, stalling and falling back.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceParams {
    /// Chance that a non-terminal node also links to itself
    pub self_loop_probability: f32,
    /// Furthest backward jump considered (in nodes)
    pub max_drop: usize,
    /// Backward edge budget per node; a self-loop consumes one slot
    pub down_k: usize,
    /// Weighting of backward candidates
    pub weighting: DropWeight,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            self_loop_probability: 0.22,
            max_drop: 2,
            down_k: 3,
            weighting: DropWeight::Linear,
        }
    }
}

/// Square boolean matrix; row `i` lists the outgoing edges of node `i`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    rows: Vec<Vec<bool>>,
}

impl AdjacencyMatrix {
    /// Build from explicit rows. Rows shorter than the matrix are padded with `false`.
    pub fn from_rows(mut rows: Vec<Vec<bool>>) -> Self {
        let size = rows.len();
        for row in &mut rows {
            row.resize(size, false);
        }
        Self { rows }
    }

    /// Number of nodes
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Whether the edge `from -> to` exists. Out-of-range indices have no edges.
    #[inline]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(false)
    }

    /// Outgoing edges of `node`, or an empty slice for out-of-range nodes.
    pub fn row(&self, node: usize) -> &[bool] {
        self.rows.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Destination indices reachable in one move from `node`, ascending.
    pub fn successors(&self, node: usize) -> Vec<usize> {
        self.row(node)
            .iter()
            .enumerate()
            .filter_map(|(j, &edge)| edge.then_some(j))
            .collect()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&edge| edge).count()
    }
}

/// Generate a move-graph with the configured weighting.
pub fn generate_adjacency<R: Rng + ?Sized>(
    size: usize,
    params: &BalanceParams,
    rng: &mut R,
) -> AdjacencyMatrix {
    let weighting = params.weighting;
    generate_adjacency_with(size, params, |k, max_drop| weighting.weight(k, max_drop), rng)
}

/// Generate a move-graph using an arbitrary drop weighting.
///
/// `weight_fn(k, max_drop)` is evaluated for `k = 1..=min(max_drop, i)`;
/// non-positive results exclude the candidate.
pub fn generate_adjacency_with<R, F>(
    size: usize,
    params: &BalanceParams,
    weight_fn: F,
    rng: &mut R,
) -> AdjacencyMatrix
where
    R: Rng + ?Sized,
    F: Fn(usize, usize) -> f32,
{
    let p_self = f64::from(params.self_loop_probability.clamp(0.0, 1.0));
    let mut rows = Vec::with_capacity(size);

    for i in 0..size {
        let mut row = vec![false; size];

        // Forward guarantee
        if i + 1 < size {
            row[i + 1] = true;
        }

        let self_loop = i + 1 < size && rng.gen_bool(p_self);
        if self_loop {
            row[i] = true;
        }

        let reach = params.max_drop.min(i);
        let candidates: Vec<(usize, f32)> = (1..=reach)
            .map(|k| (i - k, weight_fn(k, params.max_drop).max(0.0)))
            .filter(|&(_, w)| w > 0.0)
            .collect();

        let slots = params
            .down_k
            .saturating_sub(usize::from(self_loop))
            .min(candidates.len());

        for j in weighted_sample_without_replacement(&candidates, slots, &mut *rng) {
            row[j] = true;
        }

        rows.push(row);
    }

    let matrix = AdjacencyMatrix { rows };
    tracing::debug!(size, edges = matrix.edge_count(), "generated adjacency matrix");
    matrix
}

/// Draw up to `count` items without replacement, each draw proportional to the
/// remaining weights.
///
/// Items with non-positive (or non-finite) weight are never selected. Fewer than
/// `count` items come back when the pool runs dry.
pub fn weighted_sample_without_replacement<T, R>(
    pool: &[(T, f32)],
    count: usize,
    rng: &mut R,
) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut remaining: Vec<(T, f32)> = pool
        .iter()
        .filter(|(_, w)| w.is_finite() && *w > 0.0)
        .cloned()
        .collect();
    let mut out = Vec::with_capacity(count.min(remaining.len()));

    while out.len() < count && !remaining.is_empty() {
        let total: f32 = remaining.iter().map(|(_, w)| *w).sum();
        if total <= 0.0 {
            break;
        }

        let mut r = rng.gen_range(0.0..total);
        let mut idx = 0;
        while idx < remaining.len() {
            r -= remaining[idx].1;
            if r <= 0.0 {
                break;
            }
            idx += 1;
        }
        // Rounding can walk past the end; the last item absorbs it
        let idx = idx.min(remaining.len() - 1);

        out.push(remaining.remove(idx).0);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_forward_edge_on_every_non_terminal_row() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = generate_adjacency(12, &BalanceParams::default(), &mut rng);
        for i in 0..11 {
            assert!(a.has_edge(i, i + 1), "missing forward edge {i} -> {}", i + 1);
        }
    }

    #[test]
    fn test_terminal_row_has_no_forward_or_self_edge() {
        let params = BalanceParams {
            self_loop_probability: 1.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let a = generate_adjacency(5, &params, &mut rng);
        assert!(!a.has_edge(4, 4));
        // Backward edges are still allowed from the last node
        assert!(a.has_edge(4, 3) || a.has_edge(4, 2));
    }

    #[test]
    fn test_self_loop_consumes_a_drop_slot() {
        let params = BalanceParams {
            self_loop_probability: 1.0,
            max_drop: 3,
            down_k: 1,
            weighting: DropWeight::Uniform,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let a = generate_adjacency(6, &params, &mut rng);
        for i in 0..5 {
            assert!(a.has_edge(i, i));
            assert!((0..i).all(|j| !a.has_edge(i, j)), "row {i} has a drop");
        }
    }

    #[test]
    fn test_drops_stay_within_max_drop() {
        let params = BalanceParams {
            self_loop_probability: 0.0,
            max_drop: 2,
            down_k: 5,
            weighting: DropWeight::Linear,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let a = generate_adjacency(10, &params, &mut rng);
        for i in 0..10usize {
            for j in 0..i.saturating_sub(2) {
                assert!(!a.has_edge(i, j), "drop {i} -> {j} exceeds max_drop");
            }
            // Budget exceeds the candidates, so every candidate is taken
            for j in i.saturating_sub(2)..i {
                assert!(a.has_edge(i, j));
            }
        }
    }

    #[test]
    fn test_zero_weight_function_adds_no_drops() {
        let params = BalanceParams {
            self_loop_probability: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let a = generate_adjacency_with(8, &params, |_, _| 0.0, &mut rng);
        assert_eq!(a.edge_count(), 7);
    }

    #[test]
    fn test_sample_never_exceeds_pool() {
        let mut rng = StdRng::seed_from_u64(9);
        let pool = vec![('a', 1.0), ('b', 2.0)];
        let picked = weighted_sample_without_replacement(&pool, 10, &mut rng);
        assert_eq!(picked.len(), 2);
        assert!(picked.contains(&'a') && picked.contains(&'b'));
    }

    #[test]
    fn test_sample_skips_non_positive_weights() {
        let mut rng = StdRng::seed_from_u64(13);
        let pool = vec![(0, 0.0), (1, -3.0), (2, 1.0), (3, f32::NAN)];
        for _ in 0..50 {
            let picked = weighted_sample_without_replacement(&pool, 4, &mut rng);
            assert_eq!(picked, vec![2]);
        }
    }

    #[test]
    fn test_sample_prefers_heavy_items() {
        let mut rng = StdRng::seed_from_u64(21);
        let pool = vec![("light", 1.0), ("heavy", 9.0)];
        let heavy_first = (0..1000)
            .filter(|_| weighted_sample_without_replacement(&pool, 1, &mut rng)[0] == "heavy")
            .count();
        assert!(heavy_first > 800, "heavy picked first only {heavy_first} times");
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(generate_adjacency(0, &BalanceParams::default(), &mut rng).size(), 0);
        let one = generate_adjacency(1, &BalanceParams::default(), &mut rng);
        assert_eq!(one.size(), 1);
        assert_eq!(one.edge_count(), 0);
    }

    #[test]
    fn test_drop_weight_variants() {
        assert_eq!(DropWeight::Linear.weight(1, 2), 2.0);
        assert_eq!(DropWeight::Linear.weight(2, 2), 1.0);
        assert_eq!(DropWeight::Uniform.weight(4, 2), 1.0);
        assert_eq!(DropWeight::Geometric { ratio: 0.5 }.weight(3, 4), 0.25);
    }
}
