//! SVA driver spread over a communicator.
//!
//! Every rank executes the same outer loop in lockstep. Per iteration the
//! root broadcasts the pivot support vector, each rank sweeps its own vertex
//! stride for odd closed walks, the local minima are reduced to the root
//! under the min-odd-cycle monoid, and the winner is broadcast back so all
//! ranks accumulate the same total. Only the root keeps the support array and
//! the emitted cycles.

use crate::error::{McbError, McbResult};
use crate::comm::Communicator;
use crate::forest::ForestIndex;
use crate::gf2::Gf2Vector;
use crate::graph::Graph;
use crate::settings::McbSettings;
use crate::sva::signed::{single_signed_cycle, sweep_odd_closed_walks};
use crate::sva::{check_total, with_thread_pool, CycleBasis, SupportVectors};
use crate::wire::{min_odd_cycle, MinOddCycle};

/// Compute a minimum cycle basis with the signed strategy across the ranks
/// of `comm`.
///
/// The root returns the filled basis; the other ranks return an empty cycle
/// list carrying the same total weight.
pub fn mcb_sva_distributed<C>(
    g: &Graph,
    weights: &[f64],
    comm: &mut C,
    settings: &McbSettings,
) -> McbResult<CycleBasis>
where
    C: Communicator + Send,
{
    g.validate_weights(weights)?;
    with_thread_pool(settings.threads, || run(g, weights, comm, settings))
}

fn run<C>(
    g: &Graph,
    weights: &[f64],
    comm: &mut C,
    settings: &McbSettings,
) -> McbResult<CycleBasis>
where
    C: Communicator,
{
    let forest = ForestIndex::new(g);
    let dim = forest.dim();
    if dim == 0 {
        return Ok(CycleBasis::empty());
    }

    let root = comm.rank() == 0;
    let n = g.vertex_count();
    let stride = n.div_ceil(comm.size());
    let lo = (comm.rank() * stride).min(n);
    let hi = (lo + stride).min(n);

    let mut support = if root {
        Some(SupportVectors::new(dim))
    } else {
        None
    };
    let mut basis = CycleBasis::empty();

    for k in 0..dim {
        if settings.progress_interval != 0 && k % settings.progress_interval == 0 {
            log::debug!("rank {} at cycle {} of {}", comm.rank(), k, dim);
        }

        let pivot: Gf2Vector = match support.as_ref() {
            Some(s) => comm.broadcast(Some(s.pivot(k)?.clone()))?,
            None => comm.broadcast(None)?,
        };
        let signed = forest.support_edges(&pivot);

        // A single signed edge needs one shortest-path query; that search
        // stays on the root and the other ranks contribute the identity.
        let local_best = if signed.len() == 1 {
            if root {
                signed
                    .iter()
                    .next()
                    .copied()
                    .and_then(|e| single_signed_cycle(g, weights, e))
            } else {
                None
            }
        } else {
            sweep_odd_closed_walks(g, weights, &signed, lo..hi)
        };

        let local_wire = match local_best {
            Some((edges, weight)) => MinOddCycle::found(forest.to_indices(&edges), weight),
            None => MinOddCycle::absent(),
        };
        let reduced = comm.reduce(local_wire, min_odd_cycle)?;

        let winner: MinOddCycle = if root {
            let w = reduced.ok_or_else(|| {
                McbError::Communication("reduce yielded nothing at the root".into())
            })?;
            comm.broadcast(Some(w))?
        } else {
            comm.broadcast(None)?
        };

        if !winner.exists {
            return Err(McbError::InternalInvariant(format!(
                "no odd cycle for support vector {}",
                k
            )));
        }
        basis.total_weight += winner.weight;

        if let Some(s) = support.as_mut() {
            let characteristic = Gf2Vector::from_indices(winner.edges.iter().copied());
            s.update(k, &characteristic);
            let edges = forest.to_edges(&winner.edges);
            basis.cycles.push(edges.into_iter().collect());
        }
    }

    basis.total_weight = check_total(basis.total_weight)?;
    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{LocalCluster, SingleProcess};
    use crate::sva::mcb_sva_signed;

    fn k4() -> (Graph, Vec<f64>) {
        let g = Graph::from_edges(
            4,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        );
        (g, vec![1.0; 6])
    }

    #[test]
    fn test_single_process_matches_signed_driver() {
        let (g, w) = k4();
        let mut world = SingleProcess;
        let dist = mcb_sva_distributed(&g, &w, &mut world, &McbSettings::default()).unwrap();
        let local = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        assert_eq!(dist.total_weight, local.total_weight);
        assert_eq!(dist.cycles, local.cycles);
    }

    #[test]
    fn test_all_ranks_agree_on_total() {
        let (g, w) = k4();
        let results = LocalCluster::run(3, |world| {
            mcb_sva_distributed(&g, &w, world, &McbSettings::default())
        })
        .unwrap();
        let bases: Vec<CycleBasis> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(bases[0].total_weight, 9.0);
        assert_eq!(bases[0].len(), 3);
        for b in &bases[1..] {
            assert_eq!(b.total_weight, 9.0);
            assert!(b.cycles.is_empty());
        }
    }

    #[test]
    fn test_more_ranks_than_vertices() {
        let g = Graph::from_edges(2, vec![(0, 1), (0, 1)]);
        let w = vec![1.0, 2.0];
        let results = LocalCluster::run(4, |world| {
            mcb_sva_distributed(&g, &w, world, &McbSettings::default())
        })
        .unwrap();
        for r in results {
            assert_eq!(r.unwrap().total_weight, 3.0);
        }
    }

    #[test]
    fn test_cluster_matches_local_totals_on_weighted_square() {
        let g = Graph::from_edges(4, vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let w = vec![1.0, 1.0, 1.0, 1.0, 3.0];
        let local = mcb_sva_signed(&g, &w, &McbSettings::default()).unwrap();
        let results = LocalCluster::run(2, |world| {
            mcb_sva_distributed(&g, &w, world, &McbSettings::default())
        })
        .unwrap();
        for r in results {
            assert_eq!(r.unwrap().total_weight, local.total_weight);
        }
    }
}
