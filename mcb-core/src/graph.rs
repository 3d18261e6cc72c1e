//! Undirected multigraph with dense vertex and edge indices.
//!
//! The solver never mutates a graph; it only reads vertices, edges,
//! endpoints, and adjacency. Edge weights travel separately as a slice
//! indexed by edge id, so the same graph can be solved under different
//! weight functions.

use crate::error::{McbError, McbResult};

/// Dense vertex identifier.
pub type VertexId = usize;

/// Dense edge identifier (position in insertion order).
pub type EdgeId = usize;

/// Undirected multigraph. Parallel edges and self-loops are allowed.
#[derive(Debug, Clone)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<(VertexId, VertexId)>,
    /// Per-vertex list of (incident edge, opposite endpoint).
    /// A self-loop appears once in its vertex's list.
    adj: Vec<Vec<(EdgeId, VertexId)>>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            adj: vec![Vec::new(); vertex_count],
        }
    }

    /// Build a graph from an edge list.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut g = Self::new(vertex_count);
        for (u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Add an undirected edge and return its id.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is out of range.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> EdgeId {
        assert!(u < self.vertex_count && v < self.vertex_count, "endpoint out of range");
        let e = self.edges.len();
        self.edges.push((u, v));
        self.adj[u].push((e, v));
        if u != v {
            self.adj[v].push((e, u));
        }
        e
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Endpoints of an edge, in insertion order.
    pub fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        self.edges[e]
    }

    /// The endpoint of `e` other than `v`. For a self-loop returns `v`.
    pub fn opposite(&self, e: EdgeId, v: VertexId) -> VertexId {
        let (a, b) = self.edges[e];
        if v == a {
            b
        } else {
            a
        }
    }

    /// Whether the edge joins a vertex to itself.
    pub fn is_self_loop(&self, e: EdgeId) -> bool {
        let (a, b) = self.edges[e];
        a == b
    }

    /// Incident edges of `v` as (edge, opposite endpoint) pairs.
    pub fn neighbors(&self, v: VertexId) -> &[(EdgeId, VertexId)] {
        &self.adj[v]
    }

    /// Validate a weight slice against this graph.
    ///
    /// Weights must cover every edge and be finite and non-negative;
    /// `f64::INFINITY` is reserved as the unreachable sentinel.
    pub fn validate_weights(&self, weights: &[f64]) -> McbResult<()> {
        if weights.len() != self.edges.len() {
            return Err(McbError::InvalidInput(format!(
                "weight slice has {} entries for {} edges",
                weights.len(),
                self.edges.len()
            )));
        }
        for (e, &w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(McbError::InvalidInput(format!(
                    "weight of edge {} is not finite",
                    e
                )));
            }
            if w < 0.0 {
                return Err(McbError::InvalidInput(format!(
                    "weight of edge {} is negative ({})",
                    e, w
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_and_adjacency() {
        let mut g = Graph::new(3);
        let e0 = g.add_edge(0, 1);
        let e1 = g.add_edge(1, 2);
        assert_eq!(e0, 0);
        assert_eq!(e1, 1);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors(1), &[(0, 0), (1, 2)]);
        assert_eq!(g.opposite(0, 0), 1);
        assert_eq!(g.opposite(0, 1), 0);
    }

    #[test]
    fn test_self_loop_listed_once() {
        let mut g = Graph::new(2);
        let e = g.add_edge(1, 1);
        assert!(g.is_self_loop(e));
        assert_eq!(g.neighbors(1).len(), 1);
        assert_eq!(g.opposite(e, 1), 1);
    }

    #[test]
    fn test_parallel_edges_have_distinct_ids() {
        let mut g = Graph::new(2);
        let e0 = g.add_edge(0, 1);
        let e1 = g.add_edge(0, 1);
        assert_ne!(e0, e1);
        assert_eq!(g.neighbors(0).len(), 2);
    }

    #[test]
    fn test_validate_weights() {
        let g = Graph::from_edges(2, vec![(0, 1)]);
        assert!(g.validate_weights(&[1.0]).is_ok());
        assert!(g.validate_weights(&[]).is_err());
        assert!(g.validate_weights(&[-1.0]).is_err());
        assert!(g.validate_weights(&[f64::INFINITY]).is_err());
    }
}
