use serde::Serialize;

use crate::error::{Error, Result};
use crate::hamiltonian::HamiltonianCoefficients;
use crate::params::{ParameterVector, NUM_PARAMETERS};

/// Closed-form stand-ins for the Pauli expectation values of the ansatz
/// state. Each lies in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Expectations {
    pub zz: f64,
    pub zi: f64,
    pub iz: f64,
}

impl Expectations {
    /// `⟨ZZ⟩` couples the layer-1 RZ difference with the layer-2 RZ sum;
    /// `⟨ZI⟩` and `⟨IZ⟩` combine each qubit's RX angles across both layers.
    ///
    /// The three depend on disjoint angles, and each is a single-frequency
    /// sinusoid in every angle.
    pub fn of(params: &ParameterVector) -> Self {
        Self {
            zz: (params[0] - params[2]).cos() * (params[4] + params[6]).sin(),
            zi: params[1].cos() * params[5].cos(),
            iz: params[3].cos() * params[7].cos(),
        }
    }
}

/// ⟨H⟩ = h_ii + h_zz⟨ZZ⟩ + h_zi⟨ZI⟩ + h_iz⟨IZ⟩ for the surrogate
/// expectations.
pub fn energy(params: &ParameterVector, h: &HamiltonianCoefficients) -> f64 {
    let e = Expectations::of(params);
    h.h_ii + h.h_zz * e.zz + h.h_zi * e.zi + h.h_iz * e.iz
}

/// Validated energy evaluation.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `params` does not hold exactly
/// [`NUM_PARAMETERS`] angles, and [`Error::NumericalInstability`] if the
/// energy is not finite.
pub fn evaluate(params: &[f64], h: &HamiltonianCoefficients) -> Result<f64> {
    let params: &ParameterVector = params.try_into().map_err(|_| {
        Error::invalid_parameter(
            "parameters",
            format!("expected {NUM_PARAMETERS} angles, got {}", params.len()),
        )
    })?;

    let e = energy(params, h);
    if e.is_finite() {
        Ok(e)
    } else {
        Err(Error::NumericalInstability(format!(
            "energy evaluated to {e} (coefficients {h:?}, parameters {params:?})"
        )))
    }
}
