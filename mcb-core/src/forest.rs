//! Spanning forest edge indexing.
//!
//! Fixes an arbitrary spanning forest (BFS in vertex order) and assigns every
//! edge a dense index: non-tree edges get `[0, N)` where N is the cycle space
//! dimension, tree edges get `[N, |E|)`. Support vectors live entirely in the
//! non-tree range, so the inner product of a support vector with a full cycle
//! characteristic vector is unaffected by the tree coordinates.

use std::collections::{BTreeSet, VecDeque};

use crate::gf2::Gf2Vector;
use crate::graph::{EdgeId, Graph};

/// Stable bijection between edges and dense indices, split by forest
/// membership. Queries are O(1) for the lifetime of the index.
#[derive(Debug, Clone)]
pub struct ForestIndex {
    index_of: Vec<usize>,
    edge_of: Vec<EdgeId>,
    dim: usize,
    components: usize,
}

impl ForestIndex {
    /// Build the index by growing a BFS forest over `g` in vertex order.
    pub fn new(g: &Graph) -> Self {
        let n = g.vertex_count();
        let m = g.edge_count();

        let mut is_tree = vec![false; m];
        let mut visited = vec![false; n];
        let mut components = 0;
        let mut queue = VecDeque::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            components += 1;
            visited[start] = true;
            queue.push_back(start);
            while let Some(u) = queue.pop_front() {
                for &(e, v) in g.neighbors(u) {
                    if !visited[v] {
                        visited[v] = true;
                        is_tree[e] = true;
                        queue.push_back(v);
                    }
                }
            }
        }

        let dim = m - (n - components);
        let mut index_of = vec![0usize; m];
        let mut edge_of = vec![0usize; m];
        let mut next_nontree = 0;
        let mut next_tree = dim;
        for e in 0..m {
            let idx = if is_tree[e] {
                let i = next_tree;
                next_tree += 1;
                i
            } else {
                let i = next_nontree;
                next_nontree += 1;
                i
            };
            index_of[e] = idx;
            edge_of[idx] = e;
        }
        debug_assert_eq!(next_nontree, dim);

        Self {
            index_of,
            edge_of,
            dim,
            components,
        }
    }

    /// Dense index of an edge. Non-tree edges map into `[0, dim)`.
    pub fn index(&self, e: EdgeId) -> usize {
        self.index_of[e]
    }

    /// Edge carrying the given dense index.
    pub fn edge(&self, index: usize) -> EdgeId {
        self.edge_of[index]
    }

    /// Whether the edge belongs to the spanning forest.
    pub fn is_tree(&self, e: EdgeId) -> bool {
        self.index_of[e] >= self.dim
    }

    /// Cycle space dimension `|E| - |V| + c`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of connected components of the indexed graph.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Characteristic vector of an edge set, over all edge indices.
    pub fn cycle_vector<I: IntoIterator<Item = EdgeId>>(&self, edges: I) -> Gf2Vector {
        Gf2Vector::from_indices(edges.into_iter().map(|e| self.index_of[e]))
    }

    /// Edges selected by a support vector (indices below `dim`).
    pub fn support_edges(&self, v: &Gf2Vector) -> BTreeSet<EdgeId> {
        v.iter().map(|i| self.edge_of[i]).collect()
    }

    /// Sorted index form of an edge set, for the wire.
    pub fn to_indices(&self, edges: &BTreeSet<EdgeId>) -> Vec<usize> {
        let mut out: Vec<usize> = edges.iter().map(|&e| self.index_of[e]).collect();
        out.sort_unstable();
        out
    }

    /// Edge set named by sorted wire indices.
    pub fn to_edges(&self, indices: &[usize]) -> BTreeSet<EdgeId> {
        indices.iter().map(|&i| self.edge_of[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_of_triangle_with_chord() {
        // K4: 6 edges, 4 vertices, 1 component -> dim 3
        let g = Graph::from_edges(
            4,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        );
        let fi = ForestIndex::new(&g);
        assert_eq!(fi.dim(), 3);
        assert_eq!(fi.components(), 1);
    }

    #[test]
    fn test_forest_has_dimension_zero() {
        let g = Graph::from_edges(4, vec![(0, 1), (1, 2), (2, 3)]);
        let fi = ForestIndex::new(&g);
        assert_eq!(fi.dim(), 0);
        for e in 0..3 {
            assert!(fi.is_tree(e));
        }
    }

    #[test]
    fn test_disconnected_components_counted() {
        let g = Graph::from_edges(6, vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let fi = ForestIndex::new(&g);
        assert_eq!(fi.components(), 2);
        assert_eq!(fi.dim(), 2);
    }

    #[test]
    fn test_self_loop_is_nontree() {
        let g = Graph::from_edges(2, vec![(0, 1), (1, 1)]);
        let fi = ForestIndex::new(&g);
        assert!(fi.is_tree(0));
        assert!(!fi.is_tree(1));
        assert_eq!(fi.dim(), 1);
        assert_eq!(fi.index(1), 0);
        assert_eq!(fi.edge(0), 1);
    }

    #[test]
    fn test_bijection_is_stable() {
        let g = Graph::from_edges(3, vec![(0, 1), (1, 2), (2, 0), (0, 1)]);
        let fi = ForestIndex::new(&g);
        for e in 0..g.edge_count() {
            assert_eq!(fi.edge(fi.index(e)), e);
        }
    }

    #[test]
    fn test_round_trip_conversions() {
        let g = Graph::from_edges(3, vec![(0, 1), (1, 2), (2, 0), (0, 2)]);
        let fi = ForestIndex::new(&g);
        let edges: BTreeSet<EdgeId> = vec![0, 2, 3].into_iter().collect();
        let idx = fi.to_indices(&edges);
        assert_eq!(fi.to_edges(&idx), edges);
    }
}
