//! Benchmarking CLI for the mcb-core cycle basis solver.

mod generators;

use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mcb_core::comm::LocalCluster;
use mcb_core::{
    approx_mcb_sva_signed, approx_mcb_sva_trees, mcb_sva_distributed, mcb_sva_signed,
    mcb_sva_trees, CycleBasis, Graph, McbSettings,
};

use generators::{grid_graph, random_graph};

#[derive(Parser)]
#[command(name = "mcb-bench")]
#[command(about = "Benchmarking CLI for the mcb-core cycle basis solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverChoice {
    /// Signed shortest-path strategy
    Signed,
    /// Horton candidate pool, sorted fast path
    Trees,
    /// Horton candidate pool, full parallel scan
    TreesUnsorted,
    /// Signed strategy over an in-process rank cluster
    Distributed,
    /// Spanner preprocessing (k = 2) around the signed strategy
    ApproxSigned,
    /// Spanner preprocessing (k = 2) around the trees strategy
    ApproxTrees,
}

#[derive(Subcommand)]
enum Commands {
    /// Random multigraph benchmark
    Random {
        /// Number of vertices
        #[arg(long, default_value = "100")]
        vertices: usize,
        /// Number of edges
        #[arg(long, default_value = "300")]
        edges: usize,
        /// Maximum integer edge weight
        #[arg(long, default_value = "10")]
        max_weight: u32,
        /// RNG seed
        #[arg(long, default_value = "13")]
        seed: u64,
        /// Solver variant to run
        #[arg(long, value_enum, default_value = "trees")]
        solver: SolverChoice,
        /// Worker threads (0 = library default)
        #[arg(long, default_value = "0")]
        threads: usize,
        /// Rank count for the distributed variant
        #[arg(long, default_value = "2")]
        world: usize,
    },
    /// Unit-weight grid graph benchmark
    Grid {
        /// Grid rows
        #[arg(long, default_value = "10")]
        rows: usize,
        /// Grid columns
        #[arg(long, default_value = "10")]
        cols: usize,
        /// Solver variant to run
        #[arg(long, value_enum, default_value = "trees")]
        solver: SolverChoice,
        /// Worker threads (0 = library default)
        #[arg(long, default_value = "0")]
        threads: usize,
        /// Rank count for the distributed variant
        #[arg(long, default_value = "2")]
        world: usize,
    },
    /// Run every variant on one random graph and check they agree
    Compare {
        /// Number of vertices
        #[arg(long, default_value = "60")]
        vertices: usize,
        /// Number of edges
        #[arg(long, default_value = "150")]
        edges: usize,
        /// RNG seed
        #[arg(long, default_value = "13")]
        seed: u64,
    },
}

fn run_solver(
    choice: SolverChoice,
    g: &Graph,
    weights: &[f64],
    threads: usize,
    world: usize,
) -> Result<CycleBasis> {
    let settings = McbSettings {
        threads,
        ..Default::default()
    };
    let basis = match choice {
        SolverChoice::Signed => mcb_sva_signed(g, weights, &settings)?,
        SolverChoice::Trees => mcb_sva_trees(g, weights, &settings)?,
        SolverChoice::TreesUnsorted => {
            let settings = McbSettings {
                sorted_candidates: false,
                ..settings
            };
            mcb_sva_trees(g, weights, &settings)?
        }
        SolverChoice::Distributed => {
            let mut results = LocalCluster::run(world, |world| {
                mcb_sva_distributed(g, weights, world, &settings)
            })?;
            results.swap_remove(0)?
        }
        SolverChoice::ApproxSigned => approx_mcb_sva_signed(g, weights, 2, &settings)?,
        SolverChoice::ApproxTrees => approx_mcb_sva_trees(g, weights, 2, &settings)?,
    };
    Ok(basis)
}

fn report(name: &str, g: &Graph, basis: &CycleBasis, elapsed_ms: f64) {
    println!(
        "{:<16} n={:<6} m={:<6} cycles={:<6} total={:<12} {:.1} ms",
        name,
        g.vertex_count(),
        g.edge_count(),
        basis.len(),
        basis.total_weight,
        elapsed_ms
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Random {
            vertices,
            edges,
            max_weight,
            seed,
            solver,
            threads,
            world,
        } => {
            let (g, w) = random_graph(vertices, edges, max_weight, seed);
            let start = Instant::now();
            let basis = run_solver(solver, &g, &w, threads, world)?;
            report("random", &g, &basis, start.elapsed().as_secs_f64() * 1e3);
        }
        Commands::Grid {
            rows,
            cols,
            solver,
            threads,
            world,
        } => {
            let (g, w) = grid_graph(rows, cols);
            let start = Instant::now();
            let basis = run_solver(solver, &g, &w, threads, world)?;
            report("grid", &g, &basis, start.elapsed().as_secs_f64() * 1e3);
        }
        Commands::Compare { vertices, edges, seed } => {
            let (g, w) = random_graph(vertices, edges, 10, seed);
            let mut exact_total: Option<f64> = None;
            for (name, choice) in [
                ("signed", SolverChoice::Signed),
                ("trees", SolverChoice::Trees),
                ("trees-unsorted", SolverChoice::TreesUnsorted),
                ("distributed", SolverChoice::Distributed),
            ] {
                let start = Instant::now();
                let basis = run_solver(choice, &g, &w, 0, 2)?;
                report(name, &g, &basis, start.elapsed().as_secs_f64() * 1e3);
                match exact_total {
                    None => exact_total = Some(basis.total_weight),
                    Some(t) if (t - basis.total_weight).abs() > 1e-9 => {
                        bail!("{} disagrees: {} vs {}", name, basis.total_weight, t);
                    }
                    Some(_) => {}
                }
            }
            println!("all exact variants agree");
        }
    }

    Ok(())
}
