//! Potential-energy curves: one independent optimization per bond length.
//!
//! Every point starts from the same initial parameters, so points differ only
//! in their Hamiltonian. A sweep fails atomically: the first bad point aborts
//! it and no partial curve is returned.

use quantum::{
    energy, hamiltonian::validate_bond_length, Error, HamiltonianModel, ParameterVector, Result,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::optimizer::{Config, Minimizer};

/// Best energy found at one bond length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyCurvePoint {
    pub bond_length: f64,
    pub energy: f64,
}

/// Drives a [`Minimizer`] across a sequence of bond lengths.
#[derive(Debug, Clone)]
pub struct EnergyCurveSampler<M> {
    model: HamiltonianModel,
    minimizer: M,
    initial: ParameterVector,
}

impl<M: Minimizer> EnergyCurveSampler<M> {
    pub fn new(model: HamiltonianModel, minimizer: M, initial: ParameterVector) -> Self {
        Self {
            model,
            minimizer,
            initial,
        }
    }

    pub fn initial_parameters(&self) -> &ParameterVector {
        &self.initial
    }

    /// Optimizes every bond length in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `bond_lengths` is empty or holds
    /// a non-positive value (checked before any optimization runs), or the
    /// first error raised by an optimization.
    pub fn sweep(&self, bond_lengths: &[f64], config: &Config) -> Result<Vec<EnergyCurvePoint>> {
        validate_bond_lengths(bond_lengths)?;

        let points = bond_lengths
            .iter()
            .map(|&r| self.point(r, config))
            .collect::<Result<Vec<_>>>()?;

        summarize(&points);
        Ok(points)
    }

    /// Same contract as [`sweep`](Self::sweep), with points optimized on the
    /// rayon thread pool. Output order matches `bond_lengths`.
    pub fn sweep_parallel(
        &self,
        bond_lengths: &[f64],
        config: &Config,
    ) -> Result<Vec<EnergyCurvePoint>>
    where
        M: Sync,
    {
        validate_bond_lengths(bond_lengths)?;

        let points = bond_lengths
            .par_iter()
            .map(|&r| self.point(r, config))
            .collect::<Result<Vec<_>>>()?;

        summarize(&points);
        Ok(points)
    }

    fn point(&self, bond_length: f64, config: &Config) -> Result<EnergyCurvePoint> {
        let h = self.model.coefficients(bond_length)?;
        let result = self
            .minimizer
            .minimize(|x| quantum::evaluate(x, &h), &self.initial, config)
            .map_err(|err| match err {
                Error::NumericalInstability(msg) => {
                    Error::NumericalInstability(format!("at bond length {bond_length}: {msg}"))
                }
                other => other,
            })?;

        debug!(
            bond_length,
            energy = result.best_energy,
            iterations = result.iterations_run,
            status = ?result.status,
            "curve point"
        );

        Ok(EnergyCurvePoint {
            bond_length,
            energy: result.best_energy,
        })
    }
}

/// Surrogate energy at fixed `parameters` for each bond length, without
/// optimizing. A quick preview of the curve's shape.
pub fn evaluate_fixed(
    model: &HamiltonianModel,
    bond_lengths: &[f64],
    parameters: &ParameterVector,
) -> Result<Vec<EnergyCurvePoint>> {
    validate_bond_lengths(bond_lengths)?;

    bond_lengths
        .iter()
        .map(|&bond_length| {
            let h = model.coefficients(bond_length)?;
            let e = energy(parameters, &h);
            if !e.is_finite() {
                return Err(Error::NumericalInstability(format!(
                    "energy evaluated to {e} at bond length {bond_length}"
                )));
            }
            Ok(EnergyCurvePoint {
                bond_length,
                energy: e,
            })
        })
        .collect()
}

fn validate_bond_lengths(bond_lengths: &[f64]) -> Result<()> {
    if bond_lengths.is_empty() {
        return Err(Error::invalid_parameter(
            "bond_lengths",
            "must contain at least one value",
        ));
    }
    bond_lengths
        .iter()
        .try_for_each(|&r| validate_bond_length(r))
}

fn summarize(points: &[EnergyCurvePoint]) {
    let lowest = points
        .iter()
        .min_by(|a, b| a.energy.total_cmp(&b.energy));
    if let Some(p) = lowest {
        info!(
            points = points.len(),
            bond_length = p.bond_length,
            energy = p.energy,
            "energy curve minimum"
        );
    }
}

/// Evenly spaced bond lengths from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, points: usize) -> Result<Vec<f64>> {
    validate_bond_length(start)?;
    validate_bond_length(stop)?;
    if points < 2 {
        return Err(Error::invalid_parameter("points", "must be at least 2"));
    }
    if stop <= start {
        return Err(Error::invalid_parameter(
            "stop",
            format!("must exceed start ({start}), got {stop}"),
        ));
    }

    let step = (stop - start) / (points - 1) as f64;
    Ok((0..points)
        .map(|i| if i + 1 == points { stop } else { start + step * i as f64 })
        .collect())
}
