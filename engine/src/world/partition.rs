//! Level Partitioning
//!
//! Splits the board into stacked levels. The first and last node each sit
//! alone on the bottom and top level; the nodes in between are grouped by the
//! integer partition of `size - 2` (parts capped at `max_part`) whose product
//! is largest, which gives the widest spread of routes through the middle.
//!
//! Ties between partitions with the same product go to the first one found.
//! Enumeration tries the largest part first at every step, so the winner is
//! deterministic but not the only maximum.

use serde::{Deserialize, Serialize};

/// Node index -> 1-based level, plus the per-level node counts it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAssignment {
    levels: Vec<u32>,
    counts: Vec<usize>,
}

impl LevelAssignment {
    /// Expand per-level counts into consecutive node indices.
    ///
    /// The first `counts[0]` nodes land on level 1, the next `counts[1]` on
    /// level 2, and so on. Expansion stops after `size` nodes.
    pub fn from_counts(counts: &[usize], size: usize) -> Self {
        let mut levels = Vec::with_capacity(size);
        let mut kept = Vec::with_capacity(counts.len());
        for (idx, &count) in counts.iter().enumerate() {
            let take = count.min(size - levels.len());
            if take == 0 {
                break;
            }
            levels.extend(std::iter::repeat_n(idx as u32 + 1, take));
            kept.push(take);
        }
        Self { levels, counts: kept }
    }

    /// Level of `node`, or `None` when out of range.
    #[inline]
    pub fn level_of(&self, node: usize) -> Option<u32> {
        self.levels.get(node).copied()
    }

    /// Number of levels (the highest level number)
    #[inline]
    pub fn level_count(&self) -> u32 {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// Nodes on `level`, in index order.
    pub fn nodes_on(&self, level: u32) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| (l == level).then_some(i))
            .collect()
    }

    /// Node count per level, bottom first
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Per-node levels
    pub fn as_slice(&self) -> &[u32] {
        &self.levels
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// All partitions of `n` into non-increasing parts no larger than `max_part`.
///
/// Order: at every position the largest admissible part is tried first, so
/// `[4, 1]` precedes `[3, 2]` for `n = 5`. `n = 0` yields the single empty
/// partition.
pub fn enumerate_partitions(n: usize, max_part: usize) -> Vec<Vec<usize>> {
    fn descend(remaining: usize, cap: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining == 0 {
            out.push(current.clone());
            return;
        }
        for part in (1..=remaining.min(cap)).rev() {
            current.push(part);
            descend(remaining - part, part, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if max_part == 0 && n > 0 {
        return out;
    }
    descend(n, max_part, &mut Vec::new(), &mut out);
    out
}

/// Partition of `n` (parts <= `max_part`) with the largest product, first found on ties.
///
/// Returns the same partition a scan of [`enumerate_partitions`] would keep,
/// without walking the exponential enumeration. A prefix `[p]` followed by
/// the first-found best of `n - p` (capped at `p`) is the first-found best
/// among every partition starting with `p`, so the table only needs one entry
/// per `(remaining, cap)` pair.
pub fn best_partition(n: usize, max_part: usize) -> Vec<usize> {
    if n == 0 || max_part == 0 {
        return Vec::new();
    }
    let cap = max_part.min(n);
    let width = cap + 1;
    // product[r * width + c]: best product for `r` with parts <= `c`; 0 when impossible
    let mut product = vec![0u128; (n + 1) * width];
    let mut lead = vec![0usize; (n + 1) * width];
    product[..width].fill(1);

    for r in 1..=n {
        for c in 1..=cap {
            let mut best = 0u128;
            let mut best_lead = 0;
            for part in (1..=r.min(c)).rev() {
                let rest = product[(r - part) * width + part];
                let candidate = rest.saturating_mul(part as u128);
                if candidate > best {
                    best = candidate;
                    best_lead = part;
                }
            }
            product[r * width + c] = best;
            lead[r * width + c] = best_lead;
        }
    }

    let mut parts = Vec::new();
    let (mut remaining, mut c) = (n, cap);
    while remaining > 0 {
        let part = lead[remaining * width + c];
        parts.push(part);
        remaining -= part;
        c = part;
    }
    parts
}

/// Assign every node to a level.
///
/// Boards smaller than two nodes have no middle; they get the two reserved
/// singleton levels, truncated to the nodes that exist.
pub fn build_levels(size: usize, max_part: usize) -> LevelAssignment {
    let max_part = max_part.max(1);
    let middle = if size >= 2 {
        best_partition(size - 2, max_part)
    } else {
        Vec::new()
    };

    let mut counts = Vec::with_capacity(middle.len() + 2);
    counts.push(1);
    counts.extend(middle);
    counts.push(1);

    let assignment = LevelAssignment::from_counts(&counts, size);
    tracing::debug!(size, max_part, counts = ?assignment.counts(), "built level partition");
    assignment
}
