//! Wire forms for the distributed driver.
//!
//! Cycles cross process boundaries as sorted forest-index vectors, never as
//! raw edge handles, so any rank that indexed the same graph can decode them.
//! The minimum-odd-cycle reducer is a commutative monoid: the non-existent
//! cycle is the identity, ties on weight fall back to the lexicographically
//! smaller index sequence, and therefore every reduction order yields the
//! same winner.

use serde::{Deserialize, Serialize};

use crate::graph::VertexId;

/// A candidate cycle in wire form: the tree source plus the forest index of
/// the closing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCandidate {
    /// Source vertex of the shortest-path tree.
    pub source: VertexId,
    /// Forest index of the non-tree edge.
    pub edge_index: usize,
}

/// Result of a local minimum-odd-cycle search, in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinOddCycle {
    /// Sorted forest indices of the cycle edges; empty when absent.
    pub edges: Vec<usize>,
    /// Total cycle weight; 0 when absent.
    pub weight: f64,
    /// Whether a cycle was found at all.
    pub exists: bool,
}

impl MinOddCycle {
    /// The identity of the reducer: no cycle found.
    pub fn absent() -> Self {
        Self {
            edges: Vec::new(),
            weight: 0.0,
            exists: false,
        }
    }

    /// A found cycle from its sorted index form and weight.
    pub fn found(edges: Vec<usize>, weight: f64) -> Self {
        Self {
            edges,
            weight,
            exists: true,
        }
    }
}

/// Reducer for local minima: prefer the one that exists, then the lighter
/// one, then the lexicographically smaller edge-index sequence.
pub fn min_odd_cycle(a: MinOddCycle, b: MinOddCycle) -> MinOddCycle {
    if !a.exists || !b.exists {
        return if a.exists { a } else { b };
    }
    let keep_a = match a.weight.total_cmp(&b.weight) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => a.edges <= b.edges,
    };
    if keep_a {
        a
    } else {
        b
    }
}
