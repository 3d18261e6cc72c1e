//! Candidate cycle pool and parity-filtered reconstruction.
//!
//! The pool holds one shortest-path tree per vertex and the Horton candidates
//! drawn from all of them. Per iteration the parities are refreshed against
//! the current signed edge set, then the candidates are scanned for the
//! lightest one whose closed walk is a simple cycle with odd signed parity.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::forest::ForestIndex;
use crate::graph::{EdgeId, Graph};
use crate::sptree::SpTree;
use crate::wire::WireCandidate;

/// A Horton candidate: a tree, a non-tree edge, and the lower-bound weight
/// `w(e) + d(s,x) + d(s,y)` of the closed walk it induces.
#[derive(Debug, Clone, Copy)]
pub struct CandidateCycle {
    /// Pool position of the tree this candidate closes over.
    pub tree: usize,
    /// The non-tree edge.
    pub edge: EdgeId,
    /// Lower bound on the reconstructed cycle weight.
    pub weight: f64,
}

/// An extracted cycle: its edge set and total weight.
pub type OddCycle = (BTreeSet<EdgeId>, f64);

/// Pick the better of two optional cycles: prefer existence, then lower
/// weight, then the lexicographically smaller edge set. Associative and
/// commutative with `None` as identity, so it is safe as a parallel reducer.
pub fn better_cycle(a: Option<OddCycle>, b: Option<OddCycle>) -> Option<OddCycle> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(x), Some(y)) => {
            let pick_x = match x.1.total_cmp(&y.1) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Greater => false,
                std::cmp::Ordering::Equal => x.0 <= y.0,
            };
            Some(if pick_x { x } else { y })
        }
    }
}

/// Pool of per-source trees and their candidates.
#[derive(Debug)]
pub struct CandidatePool {
    trees: Vec<SpTree>,
    cycles: Vec<CandidateCycle>,
    sorted: bool,
}

impl CandidatePool {
    /// Build trees for every vertex and collect their candidates.
    ///
    /// With `sorted` set the candidates are ordered by ascending lower-bound
    /// weight (ties by tree then edge, keeping the order deterministic),
    /// which enables the first-hit fast path in [`Self::shortest_odd_cycle`].
    pub fn build(g: &Graph, weights: &[f64], sorted: bool) -> Self {
        let trees: Vec<SpTree> = (0..g.vertex_count())
            .into_par_iter()
            .map(|v| SpTree::build(v, g, weights, v))
            .collect();

        let mut cycles: Vec<CandidateCycle> = trees
            .par_iter()
            .flat_map_iter(|t| t.candidate_cycles(g, weights))
            .collect();

        if sorted {
            cycles.sort_by(|a, b| {
                a.weight
                    .total_cmp(&b.weight)
                    .then_with(|| a.tree.cmp(&b.tree))
                    .then_with(|| a.edge.cmp(&b.edge))
            });
        }

        Self {
            trees,
            cycles,
            sorted,
        }
    }

    /// Number of candidates in the pool.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Wire form of the pool: one `(source vertex, forest index)` pair per
    /// candidate.
    pub fn serializable_candidates(&self, forest: &ForestIndex) -> Vec<WireCandidate> {
        self.cycles
            .iter()
            .map(|c| WireCandidate {
                source: self.trees[c.tree].source,
                edge_index: forest.index(c.edge),
            })
            .collect()
    }

    /// Rebuild a candidate from its wire form against this pool's trees.
    ///
    /// Trees are keyed by source vertex, so the pair survives a trip through
    /// another process that built its own pool over the same graph.
    pub fn candidate_from_wire(
        &self,
        g: &Graph,
        weights: &[f64],
        forest: &ForestIndex,
        wire: &WireCandidate,
    ) -> CandidateCycle {
        let edge = forest.edge(wire.edge_index);
        let (x, y) = g.endpoints(edge);
        let tree = &self.trees[wire.source];
        CandidateCycle {
            tree: tree.id,
            edge,
            weight: weights[edge] + tree.dist[x] + tree.dist[y],
        }
    }

    /// Minimum-weight cycle with odd intersection parity against `signed`.
    ///
    /// Refreshes all tree parities (parallel over trees), then scans the
    /// candidates. In sorted mode the scan is sequential and stops at the
    /// first survivor, since the pool order makes its lower bound a proof of
    /// minimality. Otherwise the scan is a parallel reduction where each
    /// split keeps a running minimum as its pruning bound.
    pub fn shortest_odd_cycle(
        &mut self,
        g: &Graph,
        weights: &[f64],
        signed: &BTreeSet<EdgeId>,
    ) -> Option<OddCycle> {
        self.trees
            .par_iter_mut()
            .for_each(|t| t.update_parities(signed));

        if self.sorted {
            let trees = &self.trees;
            return self
                .cycles
                .iter()
                .find_map(|c| reconstruct(trees, c, g, weights, signed, None));
        }

        let trees = &self.trees;
        self.cycles
            .par_iter()
            .fold(
                || None,
                |running: Option<OddCycle>, c| {
                    let bound = running.as_ref().map(|r| r.1);
                    let built = reconstruct(trees, c, g, weights, signed, bound);
                    better_cycle(running, built)
                },
            )
            .reduce(|| None, better_cycle)
    }
}

/// Reconstruct a candidate into an explicit cycle, or reject it.
///
/// The closed walk is a usable cycle iff its signed parity is odd and the two
/// tree paths are edge-disjoint. The walk accumulates weight as it goes and
/// gives up as soon as it strictly exceeds `bound`; a weight equal to the
/// bound is kept so that ties reach the reducer.
fn reconstruct(
    trees: &[SpTree],
    c: &CandidateCycle,
    g: &Graph,
    weights: &[f64],
    signed: &BTreeSet<EdgeId>,
    bound: Option<f64>,
) -> Option<OddCycle> {
    let tree = &trees[c.tree];
    let (x, y) = g.endpoints(c.edge);

    if !(tree.parity[x] ^ tree.parity[y] ^ signed.contains(&c.edge)) {
        return None;
    }

    let mut edges = BTreeSet::new();
    edges.insert(c.edge);
    let mut weight = weights[c.edge];
    if over(weight, bound) {
        return None;
    }

    for start in [x, y] {
        let mut v = start;
        while let Some(e) = tree.pred[v] {
            if !edges.insert(e) {
                return None;
            }
            weight += weights[e];
            if !weight.is_finite() || over(weight, bound) {
                return None;
            }
            v = g.opposite(e, v);
        }
    }

    Some((edges, weight))
}

fn over(weight: f64, bound: Option<f64>) -> bool {
    matches!(bound, Some(b) if weight > b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Graph, Vec<f64>) {
        let g = Graph::from_edges(3, vec![(0, 1), (1, 2), (2, 0)]);
        (g, vec![1.0, 1.0, 1.0])
    }

    #[test]
    fn test_pool_finds_triangle() {
        let (g, w) = triangle();
        let mut pool = CandidatePool::build(&g, &w, false);
        let signed: BTreeSet<EdgeId> = [0].into_iter().collect();
        let (edges, weight) = pool.shortest_odd_cycle(&g, &w, &signed).unwrap();
        assert_eq!(edges, [0, 1, 2].into_iter().collect());
        assert_eq!(weight, 3.0);
    }

    #[test]
    fn test_sorted_and_unsorted_agree() {
        let g = Graph::from_edges(4, vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let w = vec![1.0, 1.0, 1.0, 1.0, 3.0];
        let signed: BTreeSet<EdgeId> = [4].into_iter().collect();
        let mut sorted = CandidatePool::build(&g, &w, true);
        let mut unsorted = CandidatePool::build(&g, &w, false);
        let a = sorted.shortest_odd_cycle(&g, &w, &signed).unwrap();
        let b = unsorted.shortest_odd_cycle(&g, &w, &signed).unwrap();
        assert_eq!(a.1, b.1);
        assert_eq!(a.1, 5.0);
    }

    #[test]
    fn test_no_odd_cycle_for_orthogonal_signing() {
        let (g, w) = triangle();
        let mut pool = CandidatePool::build(&g, &w, true);
        // the triangle meets {e0, e1} twice: even parity everywhere
        let signed: BTreeSet<EdgeId> = [0, 1].into_iter().collect();
        assert!(pool.shortest_odd_cycle(&g, &w, &signed).is_none());
    }

    #[test]
    fn test_wire_candidates_round_trip() {
        use crate::forest::ForestIndex;

        let g = Graph::from_edges(4, vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let w = vec![1.0, 1.0, 1.0, 1.0, 3.0];
        let forest = ForestIndex::new(&g);
        let pool = CandidatePool::build(&g, &w, true);

        let wires = pool.serializable_candidates(&forest);
        assert_eq!(wires.len(), pool.len());

        let bytes = bincode::serialize(&wires).unwrap();
        let decoded: Vec<WireCandidate> = bincode::deserialize(&bytes).unwrap();
        for (wire, original) in decoded.iter().zip(&pool.cycles) {
            let rebuilt = pool.candidate_from_wire(&g, &w, &forest, wire);
            assert_eq!(rebuilt.edge, original.edge);
            assert_eq!(rebuilt.weight, original.weight);
        }
    }

    #[test]
    fn test_better_cycle_is_total_and_deterministic() {
        let a: OddCycle = ([0, 1, 2].into_iter().collect(), 3.0);
        let b: OddCycle = ([0, 1, 3].into_iter().collect(), 3.0);
        let left = better_cycle(Some(a.clone()), Some(b.clone()));
        let right = better_cycle(Some(b), Some(a.clone()));
        assert_eq!(left, right);
        assert_eq!(left.unwrap().0, a.0);
        assert_eq!(better_cycle(None, None), None);
    }
}
