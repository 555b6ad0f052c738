use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use quantum::HamiltonianCoefficients;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vqe::{output::write_history_csv, Cobyla, OptimizationResult, ParameterShift, VqeSolver};

/// H2 ground-state energy by VQE on the 2-qubit surrogate
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bond length in Angstrom
    #[arg(long, default_value_t = 0.735)]
    bond_length: f64,

    /// Iteration budget after the initial evaluation
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,

    /// Convergence tolerance
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f64,

    /// Minimizer
    #[arg(long, value_enum, default_value_t = OptimizerKind::Cobyla)]
    optimizer: OptimizerKind,

    /// Step size for --optimizer parameter-shift
    #[arg(long, default_value_t = 1.0)]
    learning_rate: f64,

    /// RNG seed for the initial parameters
    #[arg(long, default_value = vqe::DEFAULT_SEED)]
    seed: String,

    /// Write the convergence history (iteration,energy) to this CSV
    #[arg(long)]
    history: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log every optimizer step
    #[arg(long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
enum OptimizerKind {
    Cobyla,
    ParameterShift,
}

#[derive(Serialize)]
struct Report<'a> {
    bond_length: f64,
    seed: &'a str,
    optimizer: OptimizerKind,
    coefficients: &'a HamiltonianCoefficients,
    exact_floor: f64,
    result: &'a OptimizationResult,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let solver = VqeSolver::new(args.bond_length)?
        .with_seed(args.seed.as_str())
        .with_tolerance(args.tolerance)?;

    let h = solver.coefficients();
    info!(
        bond_length = args.bond_length,
        h_ii = h.h_ii,
        h_zz = h.h_zz,
        h_zi = h.h_zi,
        h_iz = h.h_iz,
        "hamiltonian"
    );

    let result = match args.optimizer {
        OptimizerKind::Cobyla => {
            solver.optimize_with(&Cobyla::default(), args.max_iterations, None)?
        }
        OptimizerKind::ParameterShift => {
            let minimizer = ParameterShift::new().with_learning_rate(args.learning_rate)?;
            solver.optimize_with(&minimizer, args.max_iterations, None)?
        }
    };

    let floor = h.lower_bound();
    info!(
        energy = result.best_energy,
        floor,
        gap = result.best_energy - floor,
        iterations = result.iterations_run,
        converged = result.converged(),
        "best energy"
    );

    if let Some(path) = &args.history {
        write_history_csv(path, &result.history)
            .with_context(|| format!("writing history to {}", path.display()))?;
        info!("history saved to {}", path.display());
    }

    if let Some(path) = &args.json {
        let report = Report {
            bond_length: args.bond_length,
            seed: solver.seed(),
            optimizer: args.optimizer,
            coefficients: h,
            exact_floor: floor,
            result: &result,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing result to {}", path.display()))?;
        info!("result saved to {}", path.display());
    }

    Ok(())
}
