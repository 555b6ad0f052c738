use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vqe::{evaluate_fixed, linspace, output::write_curve_csv, Cobyla, Config, VqeSolver};

#[derive(Parser, Debug)]
#[command(author, version, about = "H2 potential-energy curve by VQE over a bond-length grid")]
struct Args {
    /// First bond length in Angstrom
    #[arg(long, default_value_t = 0.3)]
    start: f64,

    /// Last bond length in Angstrom (inclusive)
    #[arg(long, default_value_t = 2.0)]
    stop: f64,

    /// Number of grid points
    #[arg(long, default_value_t = 18)]
    points: usize,

    /// Iteration budget per point
    #[arg(long, default_value_t = 50)]
    max_iterations: usize,

    /// Convergence tolerance
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f64,

    /// RNG seed (initial parameters shared by every point)
    #[arg(long, default_value = vqe::DEFAULT_SEED)]
    seed: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Optimize grid points in parallel
    #[arg(long)]
    parallel: bool,

    /// Evaluate at the seeded parameters without optimizing
    #[arg(long)]
    preview: bool,

    /// Output CSV path
    #[arg(long, default_value = "bond_sweep.csv")]
    out: PathBuf,

    /// Also write the curve as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to build Rayon thread pool")?;
    }

    let bond_lengths = linspace(args.start, args.stop, args.points)?;
    let solver = VqeSolver::new(args.start)?.with_seed(args.seed.as_str());

    let timer = Instant::now();
    let curve = if args.preview {
        evaluate_fixed(solver.model(), &bond_lengths, &solver.seeded_parameters())?
    } else {
        let config = Config::new(args.max_iterations, args.tolerance)?;
        let sampler = solver.sampler(Cobyla::default());
        if args.parallel {
            sampler.sweep_parallel(&bond_lengths, &config)?
        } else {
            sampler.sweep(&bond_lengths, &config)?
        }
    };

    for p in &curve {
        info!("r={:.4}  E={:.8}", p.bond_length, p.energy);
    }
    info!(
        points = curve.len(),
        parallel = args.parallel,
        seconds = timer.elapsed().as_secs_f64(),
        "sweep finished"
    );

    write_curve_csv(&args.out, &curve)
        .with_context(|| format!("writing curve to {}", args.out.display()))?;
    info!("curve saved to {}", args.out.display());

    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&curve)?)
            .with_context(|| format!("writing curve to {}", path.display()))?;
        info!("curve saved to {}", path.display());
    }

    Ok(())
}
