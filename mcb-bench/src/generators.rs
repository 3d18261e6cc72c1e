//! Synthetic graph families for benchmarking.

use mcb_core::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random multigraph with `n` vertices and `m` edges, weights in
/// `[1, max_weight]`.
pub fn random_graph(n: usize, m: usize, max_weight: u32, seed: u64) -> (Graph, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::new(n);
    let mut weights = Vec::with_capacity(m);
    for _ in 0..m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        g.add_edge(u, v);
        weights.push(rng.gen_range(1..=max_weight) as f64);
    }
    (g, weights)
}

/// Rectangular grid graph with unit weights; rows × cols vertices.
pub fn grid_graph(rows: usize, cols: usize) -> (Graph, Vec<f64>) {
    let mut g = Graph::new(rows * cols);
    let at = |r: usize, c: usize| r * cols + c;
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                g.add_edge(at(r, c), at(r, c + 1));
            }
            if r + 1 < rows {
                g.add_edge(at(r, c), at(r + 1, c));
            }
        }
    }
    let weights = vec![1.0; g.edge_count()];
    (g, weights)
}
