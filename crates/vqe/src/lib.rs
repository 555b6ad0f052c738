//! Variational minimization of the H2 surrogate energy.

pub mod cobyla;
pub mod gradient;
pub mod history;
mod linalg;
pub mod optimizer;
pub mod output;
pub mod solver;
pub mod sweep;

pub use cobyla::Cobyla;
pub use gradient::{parameter_shift, ParameterShift};
pub use history::{ConvergenceHistory, HistoryEntry};
pub use optimizer::{Config, Minimizer, OptimizationResult, Status};
pub use solver::{VqeSolver, DEFAULT_SEED};
pub use sweep::{evaluate_fixed, linspace, EnergyCurvePoint, EnergyCurveSampler};
