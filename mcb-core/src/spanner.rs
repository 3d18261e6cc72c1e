//! Spanner preprocessing for approximate cycle bases.
//!
//! A multiplicative `(2k-1)`-spanner of the input is built greedily: edges in
//! ascending weight order, an edge enters the spanner only when the spanner
//! cannot already connect its endpoints within `(2k-1)` times its weight.
//! The exact solver runs on the spanner, and the basis is lifted back: kept
//! edges map by identity, and every dropped edge contributes one cycle made
//! of itself plus the spanner path between its endpoints.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::dijkstra::lex_dijkstra;
use crate::error::{McbError, McbResult};
use crate::forest::ForestIndex;
use crate::graph::{EdgeId, Graph, VertexId};
use crate::settings::McbSettings;
use crate::sva::{check_total, CycleBasis};
use crate::sva::{mcb_sva_signed, mcb_sva_trees};

/// A spanner subgraph together with its mapping back to the host graph.
#[derive(Debug)]
pub struct Spanner {
    /// The spanner as its own graph; vertex ids coincide with the host's.
    pub graph: Graph,
    /// Weights of the spanner edges.
    pub weights: Vec<f64>,
    /// Host edge id of each spanner edge.
    pub to_host: Vec<EdgeId>,
    /// Host edges left out of the spanner, ascending by id.
    pub dropped: Vec<EdgeId>,
}

impl Spanner {
    /// Greedy `(2k-1)`-spanner of `(g, weights)`.
    ///
    /// Self-loops never enter a spanner (their endpoints are at distance
    /// zero). Connectivity is preserved: an edge joining two components is
    /// always kept, so the cycle space dimension of the host is exactly the
    /// spanner's dimension plus the number of dropped edges.
    pub fn build(g: &Graph, weights: &[f64], k: usize) -> Self {
        let stretch = (2 * k - 1) as f64;

        let mut order: Vec<EdgeId> = (0..g.edge_count()).collect();
        order.sort_by(|&a, &b| weights[a].total_cmp(&weights[b]).then_with(|| a.cmp(&b)));

        let mut graph = Graph::new(g.vertex_count());
        let mut sp_weights = Vec::new();
        let mut to_host = Vec::new();
        let mut dropped = Vec::new();

        for e in order {
            let (u, v) = g.endpoints(e);
            let cap = stretch * weights[e];
            if u != v && bounded_distance(&graph, &sp_weights, u, v, cap).is_none() {
                graph.add_edge(u, v);
                sp_weights.push(weights[e]);
                to_host.push(e);
            } else {
                dropped.push(e);
            }
        }
        dropped.sort_unstable();

        Self {
            graph,
            weights: sp_weights,
            to_host,
            dropped,
        }
    }
}

struct DistEntry {
    dist: f64,
    vertex: VertexId,
}

impl PartialEq for DistEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DistEntry {}

impl PartialOrd for DistEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

/// Distance from `u` to `v` if it is at most `cap`, else `None`.
fn bounded_distance(g: &Graph, weights: &[f64], u: VertexId, v: VertexId, cap: f64) -> Option<f64> {
    let n = g.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    dist[u] = 0.0;
    heap.push(Reverse(DistEntry {
        dist: 0.0,
        vertex: u,
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let x = entry.vertex;
        if settled[x] {
            continue;
        }
        settled[x] = true;
        if x == v {
            return Some(entry.dist);
        }
        for &(e, y) in g.neighbors(x) {
            if y == x || settled[y] {
                continue;
            }
            let nd = entry.dist + weights[e];
            if nd <= cap && nd.total_cmp(&dist[y]) == Ordering::Less {
                dist[y] = nd;
                heap.push(Reverse(DistEntry {
                    dist: nd,
                    vertex: y,
                }));
            }
        }
    }
    None
}

/// Approximate minimum cycle basis: spanner preprocessing around the signed
/// driver. The total weight is at most `2k-1` times the minimum.
pub fn approx_mcb_sva_signed(
    g: &Graph,
    weights: &[f64],
    k: usize,
    settings: &McbSettings,
) -> McbResult<CycleBasis> {
    approximate(g, weights, k, settings, mcb_sva_signed)
}

/// Approximate minimum cycle basis: spanner preprocessing around the trees
/// driver. The total weight is at most `2k-1` times the minimum.
pub fn approx_mcb_sva_trees(
    g: &Graph,
    weights: &[f64],
    k: usize,
    settings: &McbSettings,
) -> McbResult<CycleBasis> {
    approximate(g, weights, k, settings, mcb_sva_trees)
}

fn approximate(
    g: &Graph,
    weights: &[f64],
    k: usize,
    settings: &McbSettings,
    solve: fn(&Graph, &[f64], &McbSettings) -> McbResult<CycleBasis>,
) -> McbResult<CycleBasis> {
    if k == 0 {
        return Err(McbError::InvalidInput(
            "stretch parameter k must be at least 1".into(),
        ));
    }
    g.validate_weights(weights)?;

    let spanner = Spanner::build(g, weights, k);
    let inner = solve(&spanner.graph, &spanner.weights, settings)?;

    let mut basis = CycleBasis::empty();
    basis.total_weight = inner.total_weight;
    for cycle in &inner.cycles {
        let mut host: Vec<EdgeId> = cycle.iter().map(|&e| spanner.to_host[e]).collect();
        host.sort_unstable();
        basis.cycles.push(host);
    }

    // One cycle per dropped edge: the edge plus the spanner path between its
    // endpoints (empty for a self-loop).
    for &e in &spanner.dropped {
        let (u, v) = g.endpoints(e);
        let mut cycle = vec![e];
        let mut weight = weights[e];
        if u != v {
            let sp = lex_dijkstra(&spanner.graph, &spanner.weights, u);
            let mut x = v;
            while let Some(pe) = sp.pred[x] {
                cycle.push(spanner.to_host[pe]);
                weight += spanner.weights[pe];
                x = spanner.graph.opposite(pe, x);
            }
            if x != u || !weight.is_finite() {
                return Err(McbError::InternalInvariant(format!(
                    "spanner lost the connection between endpoints of edge {}",
                    e
                )));
            }
        }
        cycle.sort_unstable();
        basis.total_weight += weight;
        basis.cycles.push(cycle);
    }

    let dim = ForestIndex::new(g).dim();
    if basis.len() != dim {
        return Err(McbError::InternalInvariant(format!(
            "lifted basis has {} cycles, cycle space dimension is {}",
            basis.len(),
            dim
        )));
    }

    basis.total_weight = check_total(basis.total_weight)?;
    Ok(basis)
}
