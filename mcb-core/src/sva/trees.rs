//! SVA driver over the Horton candidate pool.

use crate::candidates::CandidatePool;
use crate::error::{McbError, McbResult};
use crate::forest::ForestIndex;
use crate::graph::Graph;
use crate::settings::McbSettings;
use crate::sva::{check_total, with_thread_pool, CycleBasis, SupportVectors};

/// Compute a minimum cycle basis with the shortest-path-tree strategy.
///
/// One lexicographic shortest-path tree per vertex is built up front; each
/// iteration filters the precomputed candidate pool by parity against the
/// pivot support vector instead of running fresh searches.
pub fn mcb_sva_trees(g: &Graph, weights: &[f64], settings: &McbSettings) -> McbResult<CycleBasis> {
    g.validate_weights(weights)?;
    with_thread_pool(settings.threads, || run(g, weights, settings))
}

fn run(g: &Graph, weights: &[f64], settings: &McbSettings) -> McbResult<CycleBasis> {
    let forest = ForestIndex::new(g);
    let dim = forest.dim();
    if dim == 0 {
        return Ok(CycleBasis::empty());
    }

    let mut pool = CandidatePool::build(g, weights, settings.sorted_candidates);
    log::debug!(
        "candidate pool holds {} cycles across {} trees",
        pool.len(),
        g.vertex_count()
    );

    let mut support = SupportVectors::new(dim);
    let mut basis = CycleBasis::empty();

    for k in 0..dim {
        if settings.progress_interval != 0 && k % settings.progress_interval == 0 {
            log::debug!("tree extraction at cycle {} of {}", k, dim);
        }

        let signed = forest.support_edges(support.pivot(k)?);
        let (edges, weight) = pool
            .shortest_odd_cycle(g, weights, &signed)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sva::mcb_sva_signed;

    fn theta_graph() -> (Graph, Vec<f64>) {
        // two hubs joined by three internally disjoint paths of weight 2, 3, 5
        let mut g = Graph::new(5);
        g.add_edge(0, 2); // 1.0 \ path A, weight 2
        g.add_edge(2, 1); // 1.0 /
        g.add_edge(0, 3); // 1.5 \ path B, weight 3
        g.add_edge(3, 1); // 1.5 /
        g.add_edge(0, 4); // 2.5 \ path C, weight 5
        g.add_edge(4, 1); // 2.5 /
        (g, vec![1.0, 1.0, 1.5, 1.5, 2.5, 2.5])
    }

    #[test]
    fn test_theta_graph_basis() {
        let (g, w) = theta_graph();
        let basis = mcb_sva_trees(&g, &w, &McbSettings::default()).unwrap();
        assert_eq!(basis.len(), 2);
        assert_eq!(basis.total_weight, 12.0);
        let mut weights: Vec<f64> = basis
            .cycles
            .iter()
            .map(|c| c.iter().map(|&e| w[e]).sum())
            .collect();
        weights.sort_by(f64::total_cmp);
        assert_eq!(weights, vec![5.0, 7.0]);
    }

    #[test]
    fn test_sorted_and_unsorted_totals_agree() {
        let (g, w) = theta_graph();
        let sorted = McbSettings {
            sorted_candidates: true,
            ..Default::default()
        };
        let unsorted = McbSettings {
            sorted_candidates: false,
            ..Default::default()
        };
        let a = mcb_sva_trees(&g, &w, &sorted).unwrap();
        let b = mcb_sva_trees(&g, &w, &unsorted).unwrap();
        assert_eq!(a.total_weight, b.total_weight);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_agrees_with_signed_strategy() {
        let g = Graph::from_edges(
            4,
            vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)],
        );
        let w = vec![1.0, 1.0, 1.0, 1.0, 3.0];
        let trees = mcb_sva_trees(&g, &w, &McbSettings::default()).unwrap();
        let signed = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        // square (4) plus one triangle through the diagonal (5)
        assert_eq!(trees.total_weight, 9.0);
        assert_eq!(trees.total_weight, signed.total_weight);
    }

    #[test]
    fn test_disconnected_triangles() {
        let g = Graph::from_edges(6, vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let w = vec![1.0; 6];
        let basis = mcb_sva_trees(&g, &w, &McbSettings::default()).unwrap();
        assert_eq!(basis.len(), 2);
        assert_eq!(basis.total_weight, 6.0);
    }
}
