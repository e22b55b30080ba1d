use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gridmdp::grid::Grid;
use gridmdp::mdps::solvers::policy_iteration::PolicyIteration;
use gridmdp::mdps::solvers::value_iteration::ValueIteration;
use gridmdp::mdps::{MdpSolver, SolverConfig};
use gridmdp::render::{render_policy, render_utilities};
use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AlgorithmArg {
    ValueIteration,
    PolicyIteration,
}

#[derive(Debug, Parser)]
#[command(
    name = "gridmdp",
    about = "Grid-world MDP planner: value and policy iteration over stochastic grids.",
    version
)]
struct Args {
    /// Map file in JSON format: a 2-D number array where 99 marks walls,
    /// 0 plain cells and any other value a terminal reward.
    #[arg(long, default_value = "maps/world_6x6.json")]
    map: PathBuf,

    /// Discount for the Bellman equation.
    #[arg(long, default_value_t = 0.99)]
    discount: f64,

    /// Convergence tolerance; sweeps stop below threshold * (1 - d) / d.
    #[arg(long, default_value_t = 1e-3)]
    threshold: f64,

    /// Reward for the white tiles.
    #[arg(long, default_value_t = -0.04, allow_negative_numbers = true)]
    whitespace_reward: f64,

    /// Bounded evaluation sweeps per policy-iteration pass.
    #[arg(long, default_value_t = 4)]
    evaluation_depth: usize,

    /// Abort instead of sweeping forever past this many iterations.
    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Which solver to run.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::ValueIteration)]
    algorithm: AlgorithmArg,

    /// Seed for policy iteration's random initial policy.
    #[arg(long)]
    seed: Option<u64>,

    /// Write a convergence report (JSON) for plotting.
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Hand-off to the plotting collaborator.
#[derive(Debug, Serialize)]
struct SolveReport {
    algorithm: String,
    iterations: usize,
    final_change: Option<f64>,
    change_history: Vec<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.map)
        .with_context(|| format!("reading map file {}", args.map.display()))?;
    let grid = Rc::new(Grid::from_json(&text, args.whitespace_reward)?);
    let config = SolverConfig {
        discount: args.discount,
        convergence_threshold: args.threshold,
        evaluation_depth: args.evaluation_depth,
        max_sweeps: args.max_sweeps,
    };

    let report = match args.algorithm {
        AlgorithmArg::ValueIteration => {
            let mut vi = ValueIteration::new(Rc::clone(&grid), config);
            let (final_change, iterations) = vi.exec()?;
            println!("The converged utilities are:\n");
            println!("{}", render_utilities(&grid, vi.utilities()));
            println!("The optimal policy is:\n");
            println!("{}", render_policy(&grid, vi.policy()));
            println!("Total iterations: {iterations}");
            SolveReport {
                algorithm: "value-iteration".to_string(),
                iterations,
                final_change: Some(final_change),
                change_history: vi.change_history().to_vec(),
            }
        }
        AlgorithmArg::PolicyIteration => {
            let mut pi = match args.seed {
                Some(seed) => PolicyIteration::with_seed(Rc::clone(&grid), config, seed),
                None => PolicyIteration::new(Rc::clone(&grid), config),
            };
            let (_, iterations) = pi.exec()?;
            println!("The optimal policy is:\n");
            println!("{}", render_policy(&grid, pi.policy()));
            println!("Total iterations: {iterations}");
            SolveReport {
                algorithm: "policy-iteration".to_string(),
                iterations,
                final_change: None,
                change_history: Vec::new(),
            }
        }
    };

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    Ok(())
}
