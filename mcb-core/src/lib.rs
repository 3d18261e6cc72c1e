//! Minimum cycle bases of weighted undirected graphs.
//!
//! This library computes a minimum-weight basis of the cycle space of an
//! undirected graph with non-negative edge weights, using the support-vector
//! algorithm (SVA) family. It provides:
//!
//! - **Signed extraction** (`mcb_sva_signed`): per-iteration shortest odd
//!   cycle search on the signed graph, parallel over source vertices
//! - **Shortest-path-tree extraction** (`mcb_sva_trees`): a precomputed
//!   Horton candidate pool filtered by parity, with an optional sorted
//!   fast path
//! - **Distributed driver** (`mcb_sva_distributed`): the signed strategy
//!   spread over the ranks of a [`comm::Communicator`]
//! - **Approximate drivers** (`approx_mcb_sva_*`): a greedy `(2k-1)`-spanner
//!   in front of either exact core, trading weight for speed
//!
//! # Algorithm
//!
//! The cycle space of a graph with `m` edges, `n` vertices, and `c`
//! components has dimension `N = m - n + c` over GF(2). The driver keeps `N`
//! support vectors of the dual space, initially the unit vectors. Iteration
//! `k` extracts a minimum-weight cycle with odd inner product against
//! `S[k]`, emits it, and XORs `S[k]` into every later support vector that is
//! not orthogonal to the emitted cycle. The emitted cycles are linearly
//! independent and of minimum total weight.
//!
//! # Example
//!
//! ```
//! use mcb_core::{Graph, McbSettings, mcb_sva_signed};
//!
//! // unit square with one diagonal
//! let mut g = Graph::new(4);
//! for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)] {
//!     g.add_edge(u, v);
//! }
//! let weights = vec![1.0, 1.0, 1.0, 1.0, 3.0];
//!
//! // the minimum basis is the unit square plus one triangle through the
//! // diagonal: 4 + 5
//! let basis = mcb_sva_signed(&g, &weights, &McbSettings::default()).unwrap();
//! assert_eq!(basis.len(), 2);
//! assert_eq!(basis.total_weight, 9.0);
//! ```

#![warn(clippy::all)]

pub mod candidates;
pub mod comm;
pub mod dijkstra;
pub mod error;
pub mod forest;
pub mod gf2;
pub mod graph;
pub mod settings;
pub mod spanner;
pub mod sptree;
pub mod sva;
pub mod wire;

pub use error::{McbError, McbResult};
pub use forest::ForestIndex;
pub use gf2::Gf2Vector;
pub use graph::{EdgeId, Graph, VertexId};
pub use settings::McbSettings;
pub use spanner::{approx_mcb_sva_signed, approx_mcb_sva_trees, Spanner};
pub use sva::{mcb_sva_distributed, mcb_sva_signed, mcb_sva_trees, CycleBasis};
