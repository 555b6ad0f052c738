use quantum::{Error, Result};
use serde::Serialize;

use crate::history::ConvergenceHistory;

/// Iteration budget and tolerance shared by every [`Minimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Config {
    max_iterations: usize,
    tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl Config {
    /// Creates a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `max_iterations` is zero or
    /// `tolerance` is not a finite positive number.
    pub fn new(max_iterations: usize, tolerance: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(Error::invalid_parameter("max_iterations", "must be > 0"));
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(Error::invalid_parameter(
                "tolerance",
                format!("must be finite and > 0, got {tolerance}"),
            ));
        }

        Ok(Self {
            max_iterations,
            tolerance,
        })
    }

    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// Step size or improvement fell below the tolerance.
    Converged,

    /// The iteration budget ran out first.
    MaxIterations,
}

/// Outcome of one minimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// Lowest energy recorded anywhere in `history`.
    pub best_energy: f64,

    /// Parameters at which `best_energy` was evaluated.
    pub best_parameters: Vec<f64>,

    /// Every recorded evaluation in order, starting with iteration 0.
    pub history: ConvergenceHistory,

    /// Iterations consumed after the initial evaluation.
    pub iterations_run: usize,

    /// Total objective calls, including ones not recorded in `history`.
    pub evaluations: usize,

    pub status: Status,
}

impl OptimizationResult {
    /// Builds the result from the lowest-energy entry of `history`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericalInstability`] if `history` is empty.
    pub(crate) fn from_history(
        history: ConvergenceHistory,
        iterations_run: usize,
        evaluations: usize,
        status: Status,
    ) -> Result<Self> {
        let best = history
            .best()
            .ok_or_else(|| Error::NumericalInstability("no finite energy was recorded".into()))?;
        let best_energy = best.energy;
        let best_parameters = best.parameters.clone();

        Ok(Self {
            best_energy,
            best_parameters,
            history,
            iterations_run,
            evaluations,
            status,
        })
    }

    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// An evaluation-driven minimizer over real parameter vectors.
///
/// Implementations call `objective` as often as their algorithm needs,
/// record evaluations into a [`ConvergenceHistory`], and never exceed
/// `config.max_iterations()` recorded iterations after the initial point.
pub trait Minimizer {
    /// Minimizes `objective` starting from `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for an empty `initial` vector or
    /// non-finite starting angles, and [`Error::NumericalInstability`] as soon
    /// as the objective yields a non-finite value. Errors returned by the
    /// objective abort the run unchanged.
    fn minimize<F>(
        &self,
        objective: F,
        initial: &[f64],
        config: &Config,
    ) -> Result<OptimizationResult>
    where
        F: FnMut(&[f64]) -> Result<f64>;
}

/// Calls `objective` and rejects non-finite values.
pub(crate) fn checked_eval<F>(objective: &mut F, x: &[f64]) -> Result<f64>
where
    F: FnMut(&[f64]) -> Result<f64>,
{
    let f = objective(x)?;
    if f.is_finite() {
        Ok(f)
    } else {
        Err(Error::NumericalInstability(format!(
            "objective returned {f} at {x:?}"
        )))
    }
}

/// Evaluates the objective, records each evaluation and enforces the
/// iteration budget.
pub(crate) struct Recorder<F> {
    objective: F,
    history: ConvergenceHistory,
    iterations: usize,
    evaluations: usize,
    max_iterations: usize,
}

impl<F> Recorder<F>
where
    F: FnMut(&[f64]) -> Result<f64>,
{
    /// Evaluates `initial` as iteration 0.
    pub(crate) fn start(mut objective: F, initial: &[f64], config: &Config) -> Result<(Self, f64)> {
        let f = checked_eval(&mut objective, initial)?;
        let mut history = ConvergenceHistory::with_capacity(config.max_iterations() + 1);
        history.record(0, initial, f);

        let recorder = Self {
            objective,
            history,
            iterations: 0,
            evaluations: 1,
            max_iterations: config.max_iterations(),
        };
        Ok((recorder, f))
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.iterations >= self.max_iterations
    }

    pub(crate) fn iterations(&self) -> usize {
        self.iterations
    }

    /// Consumes one iteration and records the evaluation at `x`.
    pub(crate) fn record(&mut self, x: &[f64]) -> Result<f64> {
        debug_assert!(!self.exhausted());
        let f = self.evaluate(x)?;
        self.iterations += 1;
        self.history.record(self.iterations, x, f);
        Ok(f)
    }

    /// Evaluates `x` without consuming an iteration or recording it.
    pub(crate) fn evaluate(&mut self, x: &[f64]) -> Result<f64> {
        self.evaluations += 1;
        checked_eval(&mut self.objective, x)
    }

    pub(crate) fn finish(self, status: Status) -> Result<OptimizationResult> {
        OptimizationResult::from_history(self.history, self.iterations, self.evaluations, status)
    }
}

pub(crate) fn validate_initial(initial: &[f64]) -> Result<()> {
    if initial.is_empty() {
        return Err(Error::invalid_parameter(
            "initial_parameters",
            "must contain at least one value",
        ));
    }
    if let Some(bad) = initial.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid_parameter(
            "initial_parameters",
            format!("must be finite, found {bad}"),
        ));
    }
    Ok(())
}
