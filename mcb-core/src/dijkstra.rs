//! Shortest-path primitives: lexicographic Dijkstra and the signed walk
//! search.
//!
//! `lex_dijkstra` breaks distance ties by the lexicographically smaller
//! predecessor-edge-index sequence, so every source determines one shortest
//! path tree and the Horton candidate family is well defined.
//!
//! `shortest_signed_walk` runs Dijkstra over the parity-doubled graph: each
//! vertex splits into an even and an odd copy and signed edges cross between
//! the layers. A layer-respecting shortest path is exactly the minimum-weight
//! walk with the prescribed parity of signed edges.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};

use crate::graph::{EdgeId, Graph, VertexId};

/// Shortest-path tree data produced by [`lex_dijkstra`].
#[derive(Debug, Clone)]
pub struct LexShortestPaths {
    /// Distance from the source; `f64::INFINITY` for unreachable vertices.
    pub dist: Vec<f64>,
    /// Predecessor edge on the tree path; `None` for the source and
    /// unreachable vertices.
    pub pred: Vec<Option<EdgeId>>,
    /// Vertices in settle order. The source comes first and every vertex
    /// appears after its tree parent.
    pub order: Vec<VertexId>,
}

struct LexEntry {
    dist: f64,
    key: Vec<EdgeId>,
    vertex: VertexId,
}

impl PartialEq for LexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LexEntry {}

impl PartialOrd for LexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LexEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

/// Dijkstra from `source` with deterministic lexicographic tie-breaking.
///
/// Ties on distance are resolved by comparing the edge-index sequences of the
/// competing paths. The per-vertex sequence is kept explicitly; memory is
/// proportional to the total tree path length.
pub fn lex_dijkstra(g: &Graph, weights: &[f64], source: VertexId) -> LexShortestPaths {
    let n = g.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut key: Vec<Vec<EdgeId>> = vec![Vec::new(); n];
    let mut pred: Vec<Option<EdgeId>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut order = Vec::new();

    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Reverse(LexEntry {
        dist: 0.0,
        key: Vec::new(),
        vertex: source,
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let u = entry.vertex;
        if settled[u] {
            continue;
        }
        settled[u] = true;
        order.push(u);

        for &(e, v) in g.neighbors(u) {
            if v == u || settled[v] {
                continue;
            }
            let nd = entry.dist + weights[e];
            let better = match nd.total_cmp(&dist[v]) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => {
                    let mut cand = entry.key.clone();
                    cand.push(e);
                    cand < key[v]
                }
            };
            if better {
                let mut k = entry.key.clone();
                k.push(e);
                dist[v] = nd;
                pred[v] = Some(e);
                key[v] = k.clone();
                heap.push(Reverse(LexEntry {
                    dist: nd,
                    key: k,
                    vertex: v,
                }));
            }
        }
    }

    LexShortestPaths { dist, pred, order }
}

/// A walk found by [`shortest_signed_walk`].
#[derive(Debug, Clone)]
pub struct SignedWalk {
    /// The edges of the walk. Walks that would revisit an edge are rejected
    /// during reconstruction, so this is a genuine set.
    pub edges: BTreeSet<EdgeId>,
    /// Total weight of the walk.
    pub weight: f64,
}

struct WalkEntry {
    dist: f64,
    state: usize,
}

impl PartialEq for WalkEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WalkEntry {}

impl PartialOrd for WalkEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WalkEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.state.cmp(&other.state))
    }
}

/// Minimum-weight walk from `from` to `to` whose count of `signed` edges has
/// the requested parity (`odd`), avoiding every edge in `hidden`.
///
/// With `bound` set, any walk strictly heavier than the bound is discarded;
/// a walk whose weight equals the bound is still returned, which keeps tie
/// resolution in the hands of the caller's reducer.
///
/// Walks that traverse an edge twice are rejected: dropping the repeated pair
/// yields a walk of the same parity and no greater weight, so a rejected walk
/// can never beat the true minimum.
pub fn shortest_signed_walk(
    g: &Graph,
    weights: &[f64],
    signed: &BTreeSet<EdgeId>,
    hidden: &BTreeSet<EdgeId>,
    from: VertexId,
    to: VertexId,
    odd: bool,
    bound: Option<f64>,
) -> Option<SignedWalk> {
    let n = g.vertex_count();
    let start = from * 2;
    let target = to * 2 + usize::from(odd);
    if start == target {
        return Some(SignedWalk {
            edges: BTreeSet::new(),
            weight: 0.0,
        });
    }

    let mut dist = vec![f64::INFINITY; 2 * n];
    let mut pred: Vec<Option<(EdgeId, usize)>> = vec![None; 2 * n];
    let mut settled = vec![false; 2 * n];

    let mut heap = BinaryHeap::new();
    dist[start] = 0.0;
    heap.push(Reverse(WalkEntry {
        dist: 0.0,
        state: start,
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let state = entry.state;
        if settled[state] {
            continue;
        }
        settled[state] = true;
        if state == target {
            break;
        }

        let u = state / 2;
        let parity = state % 2;
        for &(e, v) in g.neighbors(u) {
            if hidden.contains(&e) {
                continue;
            }
            let flip = usize::from(signed.contains(&e));
            let next = v * 2 + (parity ^ flip);
            if settled[next] {
                continue;
            }
            let nd = entry.dist + weights[e];
            if let Some(cap) = bound {
                if nd > cap {
                    continue;
                }
            }
            if nd.total_cmp(&dist[next]) == Ordering::Less {
                dist[next] = nd;
                pred[next] = Some((e, state));
                heap.push(Reverse(WalkEntry {
                    dist: nd,
                    state: next,
                }));
            }
        }
    }

    if !settled[target] {
        return None;
    }

    let mut edges = BTreeSet::new();
    let mut state = target;
    while state != start {
        let (e, prev) = pred[state].expect("settled non-start state has a predecessor");
        if !edges.insert(e) {
            return None;
        }
        state = prev;
    }

    Some(SignedWalk {
        edges,
        weight: dist[target],
    })
}
