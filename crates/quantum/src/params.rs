//! Ansatz parameter vectors.
//!
//! The hardware-efficient ansatz applies `RZ` then `RX` to each of the two
//! qubits, entangles them with a CNOT, and repeats the rotation layer:
//!
//! | index | layer | gate | qubit |
//! |-------|-------|------|-------|
//! | 0     | 1     | RZ   | 0     |
//! | 1     | 1     | RX   | 0     |
//! | 2     | 1     | RZ   | 1     |
//! | 3     | 1     | RX   | 1     |
//! | 4     | 2     | RZ   | 0     |
//! | 5     | 2     | RX   | 0     |
//! | 6     | 2     | RZ   | 1     |
//! | 7     | 2     | RX   | 1     |

use std::f64::consts::{FRAC_PI_2, TAU};

use rng::UniformSource;

use crate::error::{Error, Result};

pub const NUM_PARAMETERS: usize = 8;

/// Rotation angles of the ansatz, in radians.
pub type ParameterVector = [f64; NUM_PARAMETERS];

const ANGLE_CONTEXTS: [&[u8]; NUM_PARAMETERS] = [
    b"L1_RZ0", b"L1_RX0", b"L1_RZ1", b"L1_RX1", b"L2_RZ0", b"L2_RX0", b"L2_RZ1", b"L2_RX1",
];

/// Copies `values` into a [`ParameterVector`].
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] unless `values` holds exactly
/// [`NUM_PARAMETERS`] entries.
pub fn from_slice(values: &[f64]) -> Result<ParameterVector> {
    values.try_into().map_err(|_| {
        Error::invalid_parameter(
            "parameters",
            format!("expected {NUM_PARAMETERS} angles, got {}", values.len()),
        )
    })
}

/// Draws every angle uniformly from `[0, 2π]`.
pub fn random_parameters<R: UniformSource>(source: &mut R) -> ParameterVector {
    ANGLE_CONTEXTS.map(|ctx| source.next_angle(ctx))
}

/// All angles at π/2, where every surrogate cross term vanishes.
pub fn neutral_parameters() -> ParameterVector {
    [FRAC_PI_2; NUM_PARAMETERS]
}

/// Maps each angle into `[0, 2π)`.
pub fn wrap_angles(params: &[f64]) -> Vec<f64> {
    params.iter().map(|theta| theta.rem_euclid(TAU)).collect()
}
