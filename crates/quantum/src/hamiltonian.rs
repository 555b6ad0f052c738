use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Bond length (Å) at which the modeled ground-state energy is lowest.
pub const EQUILIBRIUM_BOND_LENGTH: f64 = 0.735;

/// Pauli strings of the 2-qubit H2 Hamiltonian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PauliTerm {
    II,
    ZZ,
    ZI,
    IZ,
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PauliTerm::II => "II",
            PauliTerm::ZZ => "ZZ",
            PauliTerm::ZI => "ZI",
            PauliTerm::IZ => "IZ",
        };
        f.write_str(label)
    }
}

/// H = h_ii·II + h_zz·ZZ + h_zi·ZI + h_iz·IZ
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HamiltonianCoefficients {
    pub h_ii: f64,
    pub h_zz: f64,
    pub h_zi: f64,
    pub h_iz: f64,
}

impl HamiltonianCoefficients {
    pub fn new(h_ii: f64, h_zz: f64, h_zi: f64, h_iz: f64) -> Self {
        Self {
            h_ii,
            h_zz,
            h_zi,
            h_iz,
        }
    }

    /// Coefficients labelled by their Pauli string.
    pub fn terms(&self) -> [(PauliTerm, f64); 4] {
        [
            (PauliTerm::II, self.h_ii),
            (PauliTerm::ZZ, self.h_zz),
            (PauliTerm::ZI, self.h_zi),
            (PauliTerm::IZ, self.h_iz),
        ]
    }

    /// |h_zz| + |h_zi| + |h_iz|
    pub fn off_diagonal_weight(&self) -> f64 {
        self.h_zz.abs() + self.h_zi.abs() + self.h_iz.abs()
    }

    /// Lowest energy any parameter setting can reach.
    pub fn lower_bound(&self) -> f64 {
        self.h_ii - self.off_diagonal_weight()
    }

    /// Highest energy any parameter setting can reach.
    pub fn upper_bound(&self) -> f64 {
        self.h_ii + self.off_diagonal_weight()
    }

    pub fn is_finite(&self) -> bool {
        self.terms().iter().all(|(_, c)| c.is_finite())
    }
}

/// Bond-length dependent coefficient model for H2 in a 2-qubit reduction.
///
/// The identity term is constant. The ZZ, ZI and IZ terms are Gaussians in
/// `r - r_eq`: largest at the equilibrium bond length and decaying smoothly on
/// both sides. Amplitudes are empirical; the decay rates set how sharply the
/// energy curve dips around `r_eq`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HamiltonianModel {
    equilibrium: f64,
    identity: f64,
    zz_amplitude: f64,
    z_amplitude: f64,
    zz_decay: f64,
    z_decay: f64,
}

impl Default for HamiltonianModel {
    fn default() -> Self {
        Self {
            equilibrium: EQUILIBRIUM_BOND_LENGTH,
            identity: -1.052_373_2,
            zz_amplitude: 0.397_937_42,
            z_amplitude: -0.198_968_71,
            zz_decay: 2.0,
            z_decay: 1.0,
        }
    }
}

impl HamiltonianModel {
    /// Overrides the Gaussian decay rates of the ZZ and single-Z terms.
    pub fn with_decay(mut self, zz_decay: f64, z_decay: f64) -> Result<Self> {
        if !zz_decay.is_finite() || zz_decay < 0.0 {
            return Err(Error::invalid_parameter(
                "zz_decay",
                format!("must be finite and non-negative, got {zz_decay}"),
            ));
        }
        if !z_decay.is_finite() || z_decay < 0.0 {
            return Err(Error::invalid_parameter(
                "z_decay",
                format!("must be finite and non-negative, got {z_decay}"),
            ));
        }
        self.zz_decay = zz_decay;
        self.z_decay = z_decay;
        Ok(self)
    }

    pub fn equilibrium_bond_length(&self) -> f64 {
        self.equilibrium
    }

    /// Coefficients at `bond_length` (Å).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `bond_length` is finite and
    /// strictly positive.
    pub fn coefficients(&self, bond_length: f64) -> Result<HamiltonianCoefficients> {
        validate_bond_length(bond_length)?;

        let d2 = (bond_length - self.equilibrium).powi(2);
        let z = self.z_amplitude * (-self.z_decay * d2).exp();

        Ok(HamiltonianCoefficients {
            h_ii: self.identity,
            h_zz: self.zz_amplitude * (-self.zz_decay * d2).exp(),
            h_zi: z,
            h_iz: z,
        })
    }
}

/// Coefficients at `bond_length` under the default model.
pub fn coefficients(bond_length: f64) -> Result<HamiltonianCoefficients> {
    HamiltonianModel::default().coefficients(bond_length)
}

/// Checks that `bond_length` is a physical distance.
pub fn validate_bond_length(bond_length: f64) -> Result<()> {
    if bond_length.is_finite() && bond_length > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            "bond_length",
            format!("must be finite and > 0, got {bond_length}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pauli_labels() {
        let h = HamiltonianCoefficients::new(1.0, 2.0, 3.0, 4.0);
        let labels: Vec<String> = h.terms().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(labels, ["II", "ZZ", "ZI", "IZ"]);
    }

    #[test]
    fn bounds_are_symmetric_around_identity() {
        let h = HamiltonianCoefficients::new(-1.0, 0.4, -0.2, -0.1);
        assert!((h.lower_bound() + 1.7).abs() < 1e-12);
        assert!((h.upper_bound() + 0.3).abs() < 1e-12);
    }

    #[test]
    fn negative_decay_rejected() {
        let err = HamiltonianModel::default().with_decay(-1.0, 1.0).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn zero_decay_freezes_coefficients() {
        let model = HamiltonianModel::default().with_decay(0.0, 0.0).unwrap();
        let near = model.coefficients(0.735).unwrap();
        let far = model.coefficients(4.0).unwrap();
        assert_eq!(near, far);
    }
}
