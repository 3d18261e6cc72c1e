//! SVA driver over the signed-graph extraction subsystem.

use std::collections::BTreeSet;
use std::ops::Range;

use rayon::prelude::*;

use crate::candidates::{better_cycle, OddCycle};
use crate::dijkstra::shortest_signed_walk;
use crate::error::{McbError, McbResult};
use crate::forest::ForestIndex;
use crate::graph::{EdgeId, Graph};
use crate::settings::McbSettings;
use crate::sva::{check_total, with_thread_pool, CycleBasis, SupportVectors};

/// Compute a minimum cycle basis with the signed shortest-path strategy.
///
/// Each iteration interprets the pivot support vector as a signed edge set
/// and extracts the lightest cycle crossing it an odd number of times.
pub fn mcb_sva_signed(
    g: &Graph,
    weights: &[f64],
    settings: &McbSettings,
) -> McbResult<CycleBasis> {
    g.validate_weights(weights)?;
    with_thread_pool(settings.threads, || run(g, weights, settings))
}

fn run(g: &Graph, weights: &[f64], settings: &McbSettings) -> McbResult<CycleBasis> {
    let forest = ForestIndex::new(g);
    let dim = forest.dim();
    if dim == 0 {
        return Ok(CycleBasis::empty());
    }

    let mut support = SupportVectors::new(dim);
    let mut basis = CycleBasis::empty();

    for k in 0..dim {
        if settings.progress_interval != 0 && k % settings.progress_interval == 0 {
            log::debug!("signed extraction at cycle {} of {}", k, dim);
        }

        let signed = forest.support_edges(support.pivot(k)?);
        let (edges, weight) = shortest_odd_cycle(g, weights, &signed, 0..g.vertex_count())
            .ok_or_else(|| {
                McbError::InternalInvariant(format!("no odd cycle for support vector {}", k))
            })?;

        let characteristic = forest.cycle_vector(edges.iter().copied());
        support.update(k, &characteristic);

        basis.total_weight += weight;
        basis.cycles.push(edges.into_iter().collect());
    }

    basis.total_weight = check_total(basis.total_weight)?;
    Ok(basis)
}

/// Lightest cycle with odd intersection against `signed`, searching closed
/// walks rooted at the vertices of `sources`.
///
/// A single signed edge short-circuits the vertex sweep: the cycle is that
/// edge plus the lightest path between its endpoints that avoids it (a lone
/// self-loop is already the whole cycle). Otherwise every source vertex is
/// probed for its lightest odd closed walk, in parallel, with each split's
/// running minimum as the pruning bound.
pub(crate) fn shortest_odd_cycle(
    g: &Graph,
    weights: &[f64],
    signed: &BTreeSet<EdgeId>,
    sources: Range<usize>,
) -> Option<OddCycle> {
    if signed.len() == 1 {
        let &e = signed.iter().next()?;
        return single_signed_cycle(g, weights, e);
    }
    sweep_odd_closed_walks(g, weights, signed, sources)
}

/// Parallel per-vertex sweep for the lightest odd closed walk.
pub(crate) fn sweep_odd_closed_walks(
    g: &Graph,
    weights: &[f64],
    signed: &BTreeSet<EdgeId>,
    sources: Range<usize>,
) -> Option<OddCycle> {
    sources
        .into_par_iter()
        .fold(
            || None,
            |running: Option<OddCycle>, v| {
                let bound = running.as_ref().map(|r| r.1);
                let walk =
                    shortest_signed_walk(g, weights, signed, &BTreeSet::new(), v, v, true, bound);
                better_cycle(running, walk.map(|w| (w.edges, w.weight)))
            },
        )
        .reduce(|| None, better_cycle)
}

/// Lightest cycle containing the one signed edge `e`.
pub(crate) fn single_signed_cycle(g: &Graph, weights: &[f64], e: EdgeId) -> Option<OddCycle> {
    let (a, b) = g.endpoints(e);
    if a == b {
        let edges: BTreeSet<EdgeId> = [e].into_iter().collect();
        return Some((edges, weights[e]));
    }
    let hidden: BTreeSet<EdgeId> = [e].into_iter().collect();
    let walk = shortest_signed_walk(
        g,
        weights,
        &BTreeSet::new(),
        &hidden,
        a,
        b,
        false,
        None,
    )?;
    let mut edges = walk.edges;
    edges.insert(e);
    Some((edges, walk.weight + weights[e]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_with_chord() {
        // K4 with unit weights: three triangles, total 9
        let g = Graph::from_edges(
            4,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        );
        let w = vec![1.0; 6];
        let basis = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        assert_eq!(basis.len(), 3);
        assert_eq!(basis.total_weight, 9.0);
        for c in &basis.cycles {
            assert_eq!(c.len(), 3);
        }
    }

    #[test]
    fn test_forest_yields_empty_basis() {
        let g = Graph::from_edges(4, vec![(0, 1), (1, 2), (2, 3)]);
        let w = vec![1.0; 3];
        let basis = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        assert!(basis.is_empty());
        assert_eq!(basis.total_weight, 0.0);
    }

    #[test]
    fn test_single_self_loop() {
        let g = Graph::from_edges(1, vec![(0, 0)]);
        let w = vec![2.5];
        let basis = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        assert_eq!(basis.cycles, vec![vec![0]]);
        assert_eq!(basis.total_weight, 2.5);
    }

    #[test]
    fn test_parallel_edges_form_two_cycle() {
        let g = Graph::from_edges(2, vec![(0, 1), (0, 1)]);
        let w = vec![1.0, 3.0];
        let basis = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        assert_eq!(basis.cycles, vec![vec![0, 1]]);
        assert_eq!(basis.total_weight, 4.0);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let g = Graph::from_edges(2, vec![(0, 1)]);
        let res = mcb_sva_signed(&g, &[-1.0], &McbSettings::default());
        assert!(matches!(res, Err(McbError::InvalidInput(_))));
    }
}
