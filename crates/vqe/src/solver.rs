use quantum::{
    hamiltonian::validate_bond_length, params, HamiltonianCoefficients, HamiltonianModel,
    ParameterVector, Result,
};
use rng::ONDRng;
use tracing::info;

use crate::cobyla::Cobyla;
use crate::optimizer::{Config, Minimizer, OptimizationResult};
use crate::sweep::{EnergyCurvePoint, EnergyCurveSampler};

/// Seed used when none is supplied.
pub const DEFAULT_SEED: &str = "vqe-h2";

/// VQE for H2 at one bond length.
///
/// A plain value: it keeps the bond length, the coefficient model, a default
/// [`Config`] and the seed, and nothing from previous runs. Every call to
/// [`optimize`](Self::optimize) is an independent run.
#[derive(Debug, Clone)]
pub struct VqeSolver {
    bond_length: f64,
    model: HamiltonianModel,
    coefficients: HamiltonianCoefficients,
    config: Config,
    seed: String,
}

impl VqeSolver {
    /// # Errors
    ///
    /// Returns [`quantum::Error::InvalidParameter`] unless `bond_length` is
    /// finite and strictly positive.
    pub fn new(bond_length: f64) -> Result<Self> {
        Self::with_model(bond_length, HamiltonianModel::default())
    }

    pub fn with_model(bond_length: f64, model: HamiltonianModel) -> Result<Self> {
        validate_bond_length(bond_length)?;
        let coefficients = model.coefficients(bond_length)?;

        Ok(Self {
            bond_length,
            model,
            coefficients,
            config: Config::default(),
            seed: DEFAULT_SEED.to_owned(),
        })
    }

    /// Seed for the random initial parameters.
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Budget for [`solve`](Self::solve) and tolerance for every run.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Convergence tolerance used by every run; must be finite and positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        self.config = Config::new(self.config.max_iterations(), tolerance)?;
        Ok(self)
    }

    pub fn bond_length(&self) -> f64 {
        self.bond_length
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &HamiltonianModel {
        &self.model
    }

    pub fn coefficients(&self) -> &HamiltonianCoefficients {
        &self.coefficients
    }

    /// Surrogate energy at this bond length.
    pub fn energy(&self, parameters: &[f64]) -> Result<f64> {
        quantum::evaluate(parameters, &self.coefficients)
    }

    /// Initial parameters drawn from this solver's seed.
    pub fn seeded_parameters(&self) -> ParameterVector {
        params::random_parameters(&mut ONDRng::new(self.seed.as_bytes()))
    }

    /// Runs the trust-region minimizer from the seeded start with the
    /// stored [`Config`].
    pub fn solve(&self) -> Result<OptimizationResult> {
        self.optimize(self.config.max_iterations(), None)
    }

    /// Runs the trust-region minimizer.
    ///
    /// `initial_parameters` defaults to [`seeded_parameters`](Self::seeded_parameters).
    ///
    /// # Errors
    ///
    /// Returns [`quantum::Error::InvalidParameter`] if `max_iterations` is
    /// zero or `initial_parameters` does not hold 8 finite angles, and
    /// [`quantum::Error::NumericalInstability`] if an energy is not finite.
    pub fn optimize(
        &self,
        max_iterations: usize,
        initial_parameters: Option<&[f64]>,
    ) -> Result<OptimizationResult> {
        self.optimize_with(&Cobyla::default(), max_iterations, initial_parameters)
    }

    /// Runs any [`Minimizer`].
    pub fn optimize_with<M: Minimizer>(
        &self,
        minimizer: &M,
        max_iterations: usize,
        initial_parameters: Option<&[f64]>,
    ) -> Result<OptimizationResult> {
        let config = Config::new(max_iterations, self.config.tolerance())?;
        let initial = self.initial_parameters(initial_parameters)?;

        let h = self.coefficients;
        let result = minimizer.minimize(|x| quantum::evaluate(x, &h), &initial, &config)?;

        info!(
            bond_length = self.bond_length,
            energy = result.best_energy,
            iterations = result.iterations_run,
            evaluations = result.evaluations,
            status = ?result.status,
            "optimization finished"
        );
        Ok(result)
    }

    /// Energy curve over `bond_lengths` with this solver's model, seed and
    /// tolerance. The solver's own bond length is not used.
    pub fn get_energy_curve(
        &self,
        bond_lengths: &[f64],
        max_iterations: usize,
    ) -> Result<Vec<EnergyCurvePoint>> {
        let config = Config::new(max_iterations, self.config.tolerance())?;
        self.sampler(Cobyla::default()).sweep(bond_lengths, &config)
    }

    /// A sampler sharing this solver's model and seeded start.
    pub fn sampler<M: Minimizer>(&self, minimizer: M) -> EnergyCurveSampler<M> {
        EnergyCurveSampler::new(self.model, minimizer, self.seeded_parameters())
    }

    fn initial_parameters(&self, supplied: Option<&[f64]>) -> Result<ParameterVector> {
        match supplied {
            Some(values) => params::from_slice(values),
            None => Ok(self.seeded_parameters()),
        }
    }
}
