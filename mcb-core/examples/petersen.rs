//! Cycle basis example on the Petersen graph.
//!
//! The Petersen graph has 15 edges, 10 vertices, and cycle space dimension
//! 6. With unit weights the minimum cycle basis consists of six pentagons,
//! total weight 30.

use mcb_core::{mcb_sva_signed, mcb_sva_trees, Graph, McbSettings};

fn main() {
    let mut g = Graph::new(10);
    for i in 0..5 {
        g.add_edge(i, (i + 1) % 5); // outer pentagon
    }
    for i in 0..5 {
        g.add_edge(i, i + 5); // spokes
    }
    for i in 0..5 {
        g.add_edge(5 + i, 5 + (i + 2) % 5); // inner pentagram
    }
    let weights = vec![1.0; 15];
    let settings = McbSettings::default();

    let signed = mcb_sva_signed(&g, &weights, &settings).expect("signed driver failed");
    println!("signed strategy: {} cycles, total weight {}", signed.len(), signed.total_weight);

    let trees = mcb_sva_trees(&g, &weights, &settings).expect("trees driver failed");
    println!("trees strategy:  {} cycles, total weight {}", trees.len(), trees.total_weight);

    for (k, cycle) in signed.cycles.iter().enumerate() {
        println!("  C{}: edges {:?}", k, cycle);
    }
}
